//! The application state owned by the coordinator.

use crate::event::{PageError, PageLifecycle, PageTitle};
use serde::{Deserialize, Serialize};
use wayfinder_routes::{Breadcrumb, Location};

/// Page id shown before any navigation resolved.
pub const PAGE_NOT_LOADED: &str = "page-not-loaded";

/// Snapshot of the application state.
///
/// Only the [`AppStateCoordinator`](crate::AppStateCoordinator) mutates it;
/// readers receive immutable snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
	/// Page to render.
	pub page: String,
	/// Matched route, `None` until a location resolves or after a miss.
	pub route_id: Option<String>,
	/// Current location, with identity-provider artifacts removed.
	pub location: Location,
	/// Lifecycle of the current page.
	pub page_lifecycle: PageLifecycle,
	/// Last error shown, cleared when the page leaves the error state.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<PageError>,
	/// Breadcrumb trail, home first.
	pub breadcrumbs: Vec<Breadcrumb>,
	/// Page title.
	pub title: PageTitle,
}

impl Default for ApplicationState {
	fn default() -> Self {
		Self {
			page: PAGE_NOT_LOADED.to_string(),
			route_id: None,
			location: Location::default(),
			page_lifecycle: PageLifecycle::Loading,
			error: None,
			breadcrumbs: Vec::new(),
			title: PageTitle::default(),
		}
	}
}

impl ApplicationState {
	/// Returns whether any navigation has resolved a page yet.
	pub fn is_page_loaded(&self) -> bool {
		self.page != PAGE_NOT_LOADED
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_initial_state() {
		let state = ApplicationState::default();

		assert_eq!(state.page, PAGE_NOT_LOADED);
		assert!(!state.is_page_loaded());
		assert_eq!(state.route_id, None);
		assert_eq!(state.page_lifecycle, PageLifecycle::Loading);
		assert!(state.breadcrumbs.is_empty());
	}

	#[rstest]
	fn test_state_serializes_camel_case() {
		let value = serde_json::to_value(ApplicationState::default()).unwrap();

		assert_eq!(value["page"], "page-not-loaded");
		assert_eq!(value["pageLifecycle"], "loading");
		assert!(value["routeId"].is_null());
		assert!(value.get("error").is_none());
	}
}
