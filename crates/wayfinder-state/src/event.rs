//! Application events and their payloads.
//!
//! Every state change the coordinator makes is announced as an [`AppEvent`].
//! Payloads serialize with the camelCase field names UI listeners expect.

use crate::state::ApplicationState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use wayfinder_routes::Breadcrumb;

/// Lifecycle of the page currently on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLifecycle {
	/// Data for the page is being fetched.
	#[default]
	Loading,
	/// The page is ready.
	Loaded,
	/// The page could not be shown.
	Error,
}

impl fmt::Display for PageLifecycle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Loading => write!(f, "loading"),
			Self::Loaded => write!(f, "loaded"),
			Self::Error => write!(f, "error"),
		}
	}
}

/// Payload of `route-id-update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIdUpdate {
	/// Page that renders the route.
	pub page_id: String,
	/// Matched route.
	pub route_id: String,
}

/// Title of the page and whether the header should show it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTitle {
	/// Whether the title is visible.
	pub show: bool,
	/// Title text.
	pub text: String,
}

impl PageTitle {
	/// A visible title.
	pub fn shown(text: impl Into<String>) -> Self {
		Self {
			show: true,
			text: text.into(),
		}
	}

	/// A hidden title.
	pub fn hidden(text: impl Into<String>) -> Self {
		Self {
			show: false,
			text: text.into(),
		}
	}
}

/// Payload of `breadcrumb-update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbUpdate {
	/// Whether the breadcrumb bar is visible.
	pub show: bool,
	/// Trail, home first.
	pub breadcrumbs: Vec<Breadcrumb>,
}

/// A user-visible error.
///
/// Every field is optional; listeners fall back to their own wording when
/// the message or heading is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageError {
	/// Error message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_message: Option<String>,
	/// Error heading.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_heading: Option<String>,
	/// Correlation id reported by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server_log_id: Option<String>,
}

impl PageError {
	/// An error with a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			error_message: Some(message.into()),
			..Self::default()
		}
	}

	/// Sets the heading.
	pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
		self.error_heading = Some(heading.into());
		self
	}

	/// Sets the server log id.
	pub fn with_server_log_id(mut self, id: impl Into<String>) -> Self {
		self.server_log_id = Some(id.into());
		self
	}
}

impl From<&str> for PageError {
	fn from(message: &str) -> Self {
		Self::new(message)
	}
}

impl From<String> for PageError {
	fn from(message: String) -> Self {
		Self::new(message)
	}
}

/// Payload of `page-state-update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStateUpdate {
	/// New lifecycle state.
	pub state: PageLifecycle,
	/// Page reported by `show_loaded`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page: Option<String>,
	/// Error details, present for [`PageLifecycle::Error`].
	#[serde(flatten)]
	pub error: PageError,
}

/// A button offered by a dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
	/// Label.
	pub text: String,
	/// Action name sent back in `app-dialog-action`.
	pub value: String,
	/// Render with inverted colors.
	#[serde(default)]
	pub invert: bool,
	/// Button color name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}

impl DialogButton {
	/// Creates a button.
	pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			value: value.into(),
			invert: false,
			color: None,
		}
	}

	/// The button offered when a dialog declares none.
	pub fn dismiss() -> Self {
		Self::new("Dismiss", "dismiss")
	}

	/// Renders the button inverted.
	pub fn inverted(mut self) -> Self {
		self.invert = true;
		self
	}

	/// Sets the button color.
	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = Some(color.into());
		self
	}
}

/// Payload of `app-dialog-open`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogOpen {
	/// Dialog title.
	pub title: String,
	/// Dialog body.
	pub content: String,
	/// Buttons, never empty.
	pub actions: Vec<DialogButton>,
	/// Caller data echoed back with the chosen action.
	pub data: Map<String, Value>,
}

/// Payload of `app-dialog-action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogAction {
	/// Value of the chosen button.
	pub action: String,
	/// Data the dialog was opened with.
	pub data: Map<String, Value>,
}

/// Visual kind of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
	/// Neutral notice.
	#[default]
	Info,
	/// Success confirmation.
	Success,
	/// Warning.
	Warning,
	/// Failure.
	Error,
}

/// Payload of `app-toast-update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
	/// Text of the toast.
	pub message: String,
	/// Visual kind.
	#[serde(rename = "type", default)]
	pub kind: ToastKind,
}

/// Payload of `app-toast-dismiss`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastDismiss {
	/// Dismissal note.
	pub message: String,
}

/// Payload of `alert-banner-update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBanner {
	/// Banner text. An empty message hides the banner.
	pub message: String,
	/// Optional brand color for the banner.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub brand_color: Option<String>,
}

impl From<&str> for AlertBanner {
	fn from(message: &str) -> Self {
		Self {
			message: message.to_string(),
			brand_color: None,
		}
	}
}

impl From<String> for AlertBanner {
	fn from(message: String) -> Self {
		Self {
			message,
			brand_color: None,
		}
	}
}

/// Discriminant of an [`AppEvent`], used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// `route-id-update`
	RouteIdUpdate,
	/// `page-title-update`
	PageTitleUpdate,
	/// `breadcrumb-update`
	BreadcrumbUpdate,
	/// `page-state-update`
	PageStateUpdate,
	/// `app-state-update`
	AppStateUpdate,
	/// `app-dialog-open`
	DialogOpen,
	/// `app-dialog-action`
	DialogAction,
	/// `app-toast-update`
	ToastUpdate,
	/// `app-toast-dismiss`
	ToastDismiss,
	/// `alert-banner-update`
	AlertBannerUpdate,
	/// `app-nav-close`
	NavClose,
}

impl EventKind {
	/// Every event kind.
	pub const ALL: [EventKind; 11] = [
		Self::RouteIdUpdate,
		Self::PageTitleUpdate,
		Self::BreadcrumbUpdate,
		Self::PageStateUpdate,
		Self::AppStateUpdate,
		Self::DialogOpen,
		Self::DialogAction,
		Self::ToastUpdate,
		Self::ToastDismiss,
		Self::AlertBannerUpdate,
		Self::NavClose,
	];

	/// Wire name of the event.
	pub fn name(self) -> &'static str {
		match self {
			Self::RouteIdUpdate => "route-id-update",
			Self::PageTitleUpdate => "page-title-update",
			Self::BreadcrumbUpdate => "breadcrumb-update",
			Self::PageStateUpdate => "page-state-update",
			Self::AppStateUpdate => "app-state-update",
			Self::DialogOpen => "app-dialog-open",
			Self::DialogAction => "app-dialog-action",
			Self::ToastUpdate => "app-toast-update",
			Self::ToastDismiss => "app-toast-dismiss",
			Self::AlertBannerUpdate => "alert-banner-update",
			Self::NavClose => "app-nav-close",
		}
	}

	/// Looks up a kind by wire name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.name() == name)
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An event published on the [`EventBus`](crate::EventBus).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AppEvent {
	/// Navigation matched a route.
	RouteIdUpdate(RouteIdUpdate),
	/// Page title changed.
	PageTitleUpdate(PageTitle),
	/// Breadcrumb bar changed.
	BreadcrumbUpdate(BreadcrumbUpdate),
	/// Page lifecycle changed.
	PageStateUpdate(PageStateUpdate),
	/// Full snapshot of the application state.
	AppStateUpdate(Arc<ApplicationState>),
	/// A dialog should open.
	DialogOpen(DialogOpen),
	/// A dialog button was chosen.
	DialogAction(DialogAction),
	/// A toast should show.
	ToastUpdate(Toast),
	/// The current toast should close.
	ToastDismiss(ToastDismiss),
	/// The alert banner changed.
	AlertBannerUpdate(AlertBanner),
	/// Navigation UI (drawer, menus) should close.
	NavClose,
}

impl AppEvent {
	/// Discriminant of this event.
	pub fn kind(&self) -> EventKind {
		match self {
			Self::RouteIdUpdate(_) => EventKind::RouteIdUpdate,
			Self::PageTitleUpdate(_) => EventKind::PageTitleUpdate,
			Self::BreadcrumbUpdate(_) => EventKind::BreadcrumbUpdate,
			Self::PageStateUpdate(_) => EventKind::PageStateUpdate,
			Self::AppStateUpdate(_) => EventKind::AppStateUpdate,
			Self::DialogOpen(_) => EventKind::DialogOpen,
			Self::DialogAction(_) => EventKind::DialogAction,
			Self::ToastUpdate(_) => EventKind::ToastUpdate,
			Self::ToastDismiss(_) => EventKind::ToastDismiss,
			Self::AlertBannerUpdate(_) => EventKind::AlertBannerUpdate,
			Self::NavClose => EventKind::NavClose,
		}
	}

	/// Wire name of this event.
	pub fn name(&self) -> &'static str {
		self.kind().name()
	}

	/// Serializes the payload for listeners outside Rust.
	///
	/// [`AppEvent::NavClose`] has no payload and yields `null`.
	pub fn payload_json(&self) -> serde_json::Result<Value> {
		match self {
			Self::RouteIdUpdate(p) => serde_json::to_value(p),
			Self::PageTitleUpdate(p) => serde_json::to_value(p),
			Self::BreadcrumbUpdate(p) => serde_json::to_value(p),
			Self::PageStateUpdate(p) => serde_json::to_value(p),
			Self::AppStateUpdate(p) => serde_json::to_value(p.as_ref()),
			Self::DialogOpen(p) => serde_json::to_value(p),
			Self::DialogAction(p) => serde_json::to_value(p),
			Self::ToastUpdate(p) => serde_json::to_value(p),
			Self::ToastDismiss(p) => serde_json::to_value(p),
			Self::AlertBannerUpdate(p) => serde_json::to_value(p),
			Self::NavClose => Ok(Value::Null),
		}
	}
}
