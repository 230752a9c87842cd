//! Route records and per-route overrides.
//!
//! A [`RouteRecord`] is the declarative input (usually loaded from
//! configuration). Once registered in a [`RouteTable`](crate::RouteTable) it
//! becomes a [`Route`], which additionally carries the optional title,
//! breadcrumb and path-segment overrides.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Path segment that matches any single input segment.
pub const WILDCARD: &str = "*";

/// Function producing a dynamic title, breadcrumb text or path segment.
///
/// Returning `None` means the override could not produce a value; the static
/// field of the route is used instead.
pub type TextOverride = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Declarative description of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
	/// Unique key of the route.
	#[serde(alias = "routeId")]
	pub route_id: String,
	/// Render target. Several routes may share one page.
	#[serde(alias = "pageId")]
	pub page_id: String,
	/// Literal segment, or [`WILDCARD`].
	#[serde(default, alias = "pathSegment")]
	pub path_segment: String,
	/// Route id of the parent, `None` for top-level routes.
	#[serde(default)]
	pub parent: Option<String>,
	/// Whether this route answers the empty path.
	#[serde(default, alias = "isHome")]
	pub is_home: bool,
	/// Static page title.
	#[serde(default, alias = "pageTitle")]
	pub page_title: String,
	/// Static breadcrumb text.
	#[serde(default, alias = "breadcrumbText")]
	pub breadcrumb_text: String,
}

impl RouteRecord {
	/// Creates a top-level route record.
	pub fn new(
		route_id: impl Into<String>,
		page_id: impl Into<String>,
		path_segment: impl Into<String>,
	) -> Self {
		Self {
			route_id: route_id.into(),
			page_id: page_id.into(),
			path_segment: path_segment.into(),
			parent: None,
			is_home: false,
			page_title: String::new(),
			breadcrumb_text: String::new(),
		}
	}

	/// Creates the home route record (empty path segment).
	pub fn home(route_id: impl Into<String>, page_id: impl Into<String>) -> Self {
		let mut record = Self::new(route_id, page_id, "");
		record.is_home = true;
		record
	}

	/// Sets the parent route.
	pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	/// Sets the static page title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.page_title = title.into();
		self
	}

	/// Sets the static breadcrumb text.
	pub fn with_breadcrumb(mut self, text: impl Into<String>) -> Self {
		self.breadcrumb_text = text.into();
		self
	}

	/// Returns whether the path segment is the wildcard marker.
	pub fn is_wildcard(&self) -> bool {
		self.path_segment == WILDCARD
	}
}

/// Which piece of a route an override replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideKind {
	/// Page title.
	Title,
	/// Breadcrumb text.
	Breadcrumb,
	/// Path segment used when building links.
	PathSegment,
}

impl fmt::Display for OverrideKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Title => write!(f, "title"),
			Self::Breadcrumb => write!(f, "breadcrumb"),
			Self::PathSegment => write!(f, "path segment"),
		}
	}
}

#[derive(Default)]
struct Overrides {
	title: OnceCell<TextOverride>,
	breadcrumb: OnceCell<TextOverride>,
	path_segment: OnceCell<TextOverride>,
}

impl Overrides {
	fn slot(&self, kind: OverrideKind) -> &OnceCell<TextOverride> {
		match kind {
			OverrideKind::Title => &self.title,
			OverrideKind::Breadcrumb => &self.breadcrumb,
			OverrideKind::PathSegment => &self.path_segment,
		}
	}
}

/// A registered route.
pub struct Route {
	record: RouteRecord,
	overrides: Overrides,
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("record", &self.record)
			.field("has_title_override", &self.has_override(OverrideKind::Title))
			.field(
				"has_breadcrumb_override",
				&self.has_override(OverrideKind::Breadcrumb),
			)
			.field(
				"has_path_segment_override",
				&self.has_override(OverrideKind::PathSegment),
			)
			.finish()
	}
}

impl From<RouteRecord> for Route {
	fn from(record: RouteRecord) -> Self {
		Self {
			record,
			overrides: Overrides::default(),
		}
	}
}

impl Route {
	/// Returns the declarative record.
	pub fn record(&self) -> &RouteRecord {
		&self.record
	}

	/// Returns the route id.
	pub fn route_id(&self) -> &str {
		&self.record.route_id
	}

	/// Returns the page id.
	pub fn page_id(&self) -> &str {
		&self.record.page_id
	}

	/// Returns the static path segment.
	pub fn path_segment(&self) -> &str {
		&self.record.path_segment
	}

	/// Returns the parent route id.
	pub fn parent(&self) -> Option<&str> {
		self.record.parent.as_deref()
	}

	/// Returns whether this is the home route.
	pub fn is_home(&self) -> bool {
		self.record.is_home
	}

	/// Returns whether the static path segment is the wildcard marker.
	pub fn is_wildcard(&self) -> bool {
		self.record.is_wildcard()
	}

	/// Returns whether an override of `kind` has been installed.
	pub fn has_override(&self, kind: OverrideKind) -> bool {
		self.overrides.slot(kind).get().is_some()
	}

	/// Installs an override. Only the first installation per kind is kept.
	pub(crate) fn install_override(&self, kind: OverrideKind, f: TextOverride) -> bool {
		self.overrides.slot(kind).set(f).is_ok()
	}

	/// Runs the override of `kind`, if any.
	///
	/// `None` means either no override is installed or it produced no value.
	pub(crate) fn run_override(&self, kind: OverrideKind) -> Option<String> {
		let f = self.overrides.slot(kind).get()?;
		let value = f();
		if value.is_none() {
			tracing::warn!(
				route_id = %self.record.route_id,
				%kind,
				"override produced no value, falling back to static field"
			);
		}
		value
	}

	/// Effective page title.
	pub fn title(&self) -> String {
		self.run_override(OverrideKind::Title)
			.unwrap_or_else(|| self.record.page_title.clone())
	}

	/// Effective breadcrumb text.
	pub fn breadcrumb_text(&self) -> String {
		self.run_override(OverrideKind::Breadcrumb)
			.unwrap_or_else(|| self.record.breadcrumb_text.clone())
	}

	/// Effective path segment used when building links.
	pub fn effective_path_segment(&self) -> String {
		self.run_override(OverrideKind::PathSegment)
			.unwrap_or_else(|| self.record.path_segment.clone())
	}
}
