//! Loosely-shaped inputs accepted by the coordinator.
//!
//! Pages pass titles, breadcrumbs, dialogs and toasts in whatever shape is
//! convenient; these types normalize them into event payloads.

use crate::event::{BreadcrumbUpdate, DialogButton, DialogOpen, PageTitle, Toast, ToastKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wayfinder_routes::Breadcrumb;

/// Input of [`AppStateCoordinator::set_title`](crate::AppStateCoordinator::set_title).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleRequest {
	/// Plain text, shown.
	Text(String),
	/// Explicit visibility and text.
	Explicit {
		/// Visibility, defaults to shown.
		#[serde(default)]
		show: Option<bool>,
		/// Text, defaults to empty.
		#[serde(default)]
		text: Option<String>,
	},
}

impl TitleRequest {
	/// Normalizes into a [`PageTitle`].
	pub fn into_title(self) -> PageTitle {
		match self {
			Self::Text(text) => PageTitle::shown(text),
			Self::Explicit { show, text } => PageTitle {
				show: show.unwrap_or(true),
				text: text.unwrap_or_default(),
			},
		}
	}
}

impl From<&str> for TitleRequest {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for TitleRequest {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<PageTitle> for TitleRequest {
	fn from(title: PageTitle) -> Self {
		Self::Explicit {
			show: Some(title.show),
			text: Some(title.text),
		}
	}
}

/// One breadcrumb as supplied by a page. Missing fields become `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrumbInput {
	/// Display text.
	#[serde(default)]
	pub text: Option<String>,
	/// Link.
	#[serde(default)]
	pub link: Option<String>,
}

impl CrumbInput {
	/// A crumb with both fields.
	pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
		Self {
			text: Some(text.into()),
			link: Some(link.into()),
		}
	}

	/// A crumb without a link.
	pub fn text(text: impl Into<String>) -> Self {
		Self {
			text: Some(text.into()),
			link: None,
		}
	}

	fn normalize(self) -> Breadcrumb {
		Breadcrumb::new(self.text.unwrap_or_default(), self.link.unwrap_or_default())
	}
}

impl From<Breadcrumb> for CrumbInput {
	fn from(crumb: Breadcrumb) -> Self {
		Self::new(crumb.text, crumb.link)
	}
}

/// Input of [`AppStateCoordinator::set_breadcrumbs`](crate::AppStateCoordinator::set_breadcrumbs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreadcrumbRequest {
	/// A trail, shown.
	List(Vec<CrumbInput>),
	/// Explicit visibility and trail.
	Explicit {
		/// Visibility, defaults to shown.
		#[serde(default)]
		show: Option<bool>,
		/// Trail, defaults to empty.
		#[serde(default)]
		breadcrumbs: Option<Vec<CrumbInput>>,
	},
}

impl BreadcrumbRequest {
	/// A hidden, empty trail.
	pub fn hidden() -> Self {
		Self::Explicit {
			show: Some(false),
			breadcrumbs: None,
		}
	}

	/// Normalizes into a [`BreadcrumbUpdate`].
	pub fn into_update(self) -> BreadcrumbUpdate {
		let (show, crumbs) = match self {
			Self::List(crumbs) => (true, crumbs),
			Self::Explicit { show, breadcrumbs } => {
				(show.unwrap_or(true), breadcrumbs.unwrap_or_default())
			}
		};
		BreadcrumbUpdate {
			show,
			breadcrumbs: crumbs.into_iter().map(CrumbInput::normalize).collect(),
		}
	}
}

impl From<Vec<CrumbInput>> for BreadcrumbRequest {
	fn from(crumbs: Vec<CrumbInput>) -> Self {
		Self::List(crumbs)
	}
}

impl From<Vec<Breadcrumb>> for BreadcrumbRequest {
	fn from(crumbs: Vec<Breadcrumb>) -> Self {
		Self::List(crumbs.into_iter().map(CrumbInput::from).collect())
	}
}

impl From<BreadcrumbUpdate> for BreadcrumbRequest {
	fn from(update: BreadcrumbUpdate) -> Self {
		Self::Explicit {
			show: Some(update.show),
			breadcrumbs: Some(update.breadcrumbs.into_iter().map(CrumbInput::from).collect()),
		}
	}
}

/// Input of [`AppStateCoordinator::show_dialog_modal`](crate::AppStateCoordinator::show_dialog_modal).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogOptions {
	/// Title, defaults to empty.
	#[serde(default)]
	pub title: Option<String>,
	/// Body, defaults to empty.
	#[serde(default)]
	pub content: Option<String>,
	/// Buttons. An empty list becomes a single dismiss button.
	#[serde(default)]
	pub actions: Vec<DialogButton>,
	/// Data echoed back with the chosen action, defaults to `{}`.
	#[serde(default)]
	pub data: Option<Map<String, Value>>,
}

impl DialogOptions {
	/// A dialog with a title and body.
	pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			title: Some(title.into()),
			content: Some(content.into()),
			..Self::default()
		}
	}

	/// Adds a button.
	pub fn with_action(mut self, button: DialogButton) -> Self {
		self.actions.push(button);
		self
	}

	/// Attaches caller data.
	pub fn with_data(mut self, data: Map<String, Value>) -> Self {
		self.data = Some(data);
		self
	}

	/// Normalizes into a [`DialogOpen`] payload.
	pub fn into_payload(self) -> DialogOpen {
		let actions = if self.actions.is_empty() {
			vec![DialogButton::dismiss()]
		} else {
			self.actions
		};
		DialogOpen {
			title: self.title.unwrap_or_default(),
			content: self.content.unwrap_or_default(),
			actions,
			data: self.data.unwrap_or_default(),
		}
	}
}

/// Input of [`AppStateCoordinator::show_toast`](crate::AppStateCoordinator::show_toast).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastOptions {
	/// Text. A toast without text is not shown.
	#[serde(default)]
	pub message: Option<String>,
	/// Visual kind, defaults to [`ToastKind::Info`].
	#[serde(rename = "type", default)]
	pub kind: Option<ToastKind>,
}

impl ToastOptions {
	/// A toast of the given kind.
	pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
		Self {
			message: Some(message.into()),
			kind: Some(kind),
		}
	}

	/// Normalizes into a [`Toast`], or `None` when there is no text.
	pub fn into_toast(self) -> Option<Toast> {
		let message = self.message.filter(|m| !m.is_empty())?;
		Some(Toast {
			message,
			kind: self.kind.unwrap_or_default(),
		})
	}
}

impl From<&str> for ToastOptions {
	fn from(message: &str) -> Self {
		Self {
			message: Some(message.to_string()),
			kind: None,
		}
	}
}

impl From<String> for ToastOptions {
	fn from(message: String) -> Self {
		Self {
			message: Some(message),
			kind: None,
		}
	}
}
