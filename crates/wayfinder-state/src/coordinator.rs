//! Navigation and page-lifecycle coordination.
//!
//! [`AppStateCoordinator`] is the only writer of [`ApplicationState`]. Every
//! operation updates the state first, releases the lock and only then
//! publishes, so listeners may call back into the coordinator freely.

use crate::bus::EventBus;
use crate::event::{
	AlertBanner, AppEvent, BreadcrumbUpdate, DialogAction, PageError, PageLifecycle,
	PageStateUpdate, PageTitle, RouteIdUpdate, ToastDismiss,
};
use crate::request::{BreadcrumbRequest, DialogOptions, TitleRequest, ToastOptions};
use crate::service::{ErrorOverrides, ServiceOutcome, find_service_error};
use crate::session::SessionHandle;
use crate::state::ApplicationState;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use wayfinder_routes::{Location, LocationResolver, RouteTable};

/// Message shown when a location matches no route.
pub const PAGE_NOT_FOUND_MESSAGE: &str = "Page not found";

/// Message carried by `app-toast-dismiss`.
pub const TOAST_DISMISSED_MESSAGE: &str = "Toast Dismissed";

/// Orchestrates navigation and announces every state change on the bus.
pub struct AppStateCoordinator {
	resolver: LocationResolver,
	bus: Arc<EventBus>,
	state: RwLock<ApplicationState>,
	session: Option<Arc<dyn SessionHandle>>,
}

impl fmt::Debug for AppStateCoordinator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AppStateCoordinator")
			.field("routes", &self.resolver.table().len())
			.field("bus", &self.bus)
			.field("state", &*self.state.read())
			.field("has_session", &self.session.is_some())
			.finish()
	}
}

impl AppStateCoordinator {
	/// Creates a coordinator over `table`, publishing on `bus`.
	pub fn new(table: Arc<RouteTable>, bus: Arc<EventBus>) -> Self {
		Self {
			resolver: LocationResolver::new(table),
			bus,
			state: RwLock::new(ApplicationState::default()),
			session: None,
		}
	}

	/// Attaches the session consulted for logout requests.
	pub fn with_session(mut self, session: Arc<dyn SessionHandle>) -> Self {
		self.session = Some(session);
		self
	}

	/// Route table used for resolution.
	pub fn table(&self) -> &Arc<RouteTable> {
		self.resolver.table()
	}

	/// Resolver used for navigation.
	pub fn resolver(&self) -> &LocationResolver {
		&self.resolver
	}

	/// Bus the coordinator publishes on.
	pub fn bus(&self) -> &Arc<EventBus> {
		&self.bus
	}

	/// Immutable snapshot of the current state.
	pub fn snapshot(&self) -> Arc<ApplicationState> {
		Arc::new(self.state.read().clone())
	}

	/// Handles a navigation.
	///
	/// Events, in order: `route-id-update` (or `page-state-update` with a
	/// not-found error), `breadcrumb-update` (hidden), `page-title-update`
	/// (hidden), `app-nav-close`, `app-state-update`.
	pub fn on_location_change(&self, mut location: Location) {
		if let Some(session) = &self.session
			&& session.log_out_requested(&location)
		{
			tracing::info!(path = %location.pathname(), "logout requested");
			self.show_loading();
			session.logout();
			return;
		}

		if location.strip_identity_provider_state() {
			tracing::debug!(hash = %location.hash, "removed identity provider state from hash");
		}

		let resolved = self.resolver.resolve(&location).map(|resolution| {
			(
				RouteIdUpdate {
					page_id: resolution.page_id().to_string(),
					route_id: resolution.route_id().to_string(),
				},
				resolution.breadcrumbs(false),
				resolution.title(),
			)
		});

		let (route_update, breadcrumbs, title) = {
			let mut state = self.state.write();
			state.location = location;
			match resolved {
				Some((update, breadcrumbs, title)) => {
					state.page = update.page_id.clone();
					state.route_id = Some(update.route_id.clone());
					state.breadcrumbs = breadcrumbs.clone();
					state.title = PageTitle::hidden(title);
					(Some(update), breadcrumbs, state.title.clone())
				}
				None => {
					state.route_id = None;
					state.breadcrumbs.clear();
					state.title = PageTitle::default();
					(None, Vec::new(), PageTitle::default())
				}
			}
		};

		match route_update {
			Some(update) => {
				tracing::debug!(route_id = %update.route_id, page_id = %update.page_id, "route resolved");
				self.bus.publish(AppEvent::RouteIdUpdate(update));
			}
			None => self.show_error(PAGE_NOT_FOUND_MESSAGE),
		}

		self.bus.publish(AppEvent::BreadcrumbUpdate(BreadcrumbUpdate {
			show: false,
			breadcrumbs,
		}));
		self.bus.publish(AppEvent::PageTitleUpdate(title));
		self.close_nav();
		self.bus.publish(AppEvent::AppStateUpdate(self.snapshot()));
	}

	/// Parses `url_or_path` and handles it as a navigation.
	///
	/// Unparseable input is logged and ignored.
	pub fn navigate(&self, url_or_path: &str) {
		match Location::parse(url_or_path) {
			Ok(location) => self.on_location_change(location),
			Err(e) => tracing::warn!(error = %e, "ignoring navigation to invalid location"),
		}
	}

	/// Re-announces the current state.
	///
	/// Emits `route-id-update` for the current route (or the not-found error
	/// when there is none), then `app-state-update`.
	pub fn refresh(&self) {
		let snapshot = self.snapshot();
		match &snapshot.route_id {
			Some(route_id) => {
				self.bus.publish(AppEvent::RouteIdUpdate(RouteIdUpdate {
					page_id: snapshot.page.clone(),
					route_id: route_id.clone(),
				}));
			}
			None => self.show_error(PAGE_NOT_FOUND_MESSAGE),
		}
		self.bus.publish(AppEvent::AppStateUpdate(self.snapshot()));
	}

	/// Sets the page title. Plain text is shown.
	pub fn set_title(&self, request: impl Into<TitleRequest>) {
		let title = request.into().into_title();
		self.state.write().title = title.clone();
		self.bus.publish(AppEvent::PageTitleUpdate(title));
	}

	/// Sets the breadcrumb bar. Missing text or link become `""`.
	pub fn set_breadcrumbs(&self, request: impl Into<BreadcrumbRequest>) {
		let update = request.into().into_update();
		self.state.write().breadcrumbs = update.breadcrumbs.clone();
		self.bus.publish(AppEvent::BreadcrumbUpdate(update));
	}

	/// Shows the breadcrumbs of the current route, honoring overrides
	/// installed since the navigation.
	pub fn show_route_breadcrumbs(&self) {
		let (route_id, location) = {
			let state = self.state.read();
			(state.route_id.clone(), state.location.clone())
		};
		let Some(route_id) = route_id else {
			tracing::warn!("no current route, breadcrumbs not shown");
			return;
		};
		let breadcrumbs = self
			.table()
			.breadcrumb_trail_for(&route_id, false, location.path.as_slice());
		self.set_breadcrumbs(BreadcrumbUpdate {
			show: true,
			breadcrumbs,
		});
	}

	/// Puts the page in the loading state.
	pub fn show_loading(&self) {
		self.set_lifecycle(PageStateUpdate {
			state: PageLifecycle::Loading,
			..PageStateUpdate::default()
		});
	}

	/// Puts the page in the error state.
	pub fn show_error(&self, error: impl Into<PageError>) {
		let error = error.into();
		tracing::debug!(message = ?error.error_message, server_log_id = ?error.server_log_id, "showing error");
		self.set_lifecycle(PageStateUpdate {
			state: PageLifecycle::Error,
			page: None,
			error,
		});
	}

	/// Puts the page in the loaded state.
	///
	/// A missing page id is logged and nothing else happens.
	pub fn show_loaded<'a>(&self, page: impl Into<Option<&'a str>>) {
		let Some(page) = page.into().filter(|p| !p.is_empty()) else {
			tracing::warn!("show_loaded called without a page id");
			return;
		};
		self.set_lifecycle(PageStateUpdate {
			state: PageLifecycle::Loaded,
			page: Some(page.to_string()),
			error: PageError::default(),
		});
	}

	/// Shows the most telling failure among `outcomes`, if any.
	///
	/// Returns whether an error was shown.
	pub fn show_message_if_service_error<I, O>(&self, outcomes: I, overrides: &ErrorOverrides) -> bool
	where
		I: IntoIterator<Item = O>,
		O: Into<ServiceOutcome>,
	{
		match find_service_error(outcomes, overrides) {
			Some(error) => {
				self.show_error(error);
				true
			}
			None => false,
		}
	}

	/// Opens a dialog. No actions means a single dismiss button.
	pub fn show_dialog_modal(&self, options: DialogOptions) {
		self.bus.publish(AppEvent::DialogOpen(options.into_payload()));
	}

	/// Reports the button chosen in a dialog.
	pub fn dialog_action(&self, action: impl Into<String>, data: Map<String, Value>) {
		self.bus.publish(AppEvent::DialogAction(DialogAction {
			action: action.into(),
			data,
		}));
	}

	/// Shows a toast. A toast without text is logged and dropped.
	pub fn show_toast(&self, options: impl Into<ToastOptions>) {
		match options.into().into_toast() {
			Some(toast) => {
				self.bus.publish(AppEvent::ToastUpdate(toast));
			}
			None => tracing::warn!("toast without a message ignored"),
		}
	}

	/// Dismisses the current toast.
	pub fn dismiss_toast(&self) {
		self.bus.publish(AppEvent::ToastDismiss(ToastDismiss {
			message: TOAST_DISMISSED_MESSAGE.to_string(),
		}));
	}

	/// Updates the alert banner. An empty message hides it.
	pub fn show_alert_banner(&self, banner: impl Into<AlertBanner>) {
		self.bus.publish(AppEvent::AlertBannerUpdate(banner.into()));
	}

	/// Asks navigation UI to close.
	pub fn close_nav(&self) {
		self.bus.publish(AppEvent::NavClose);
	}

	/// Segment of the current location at `index`.
	pub fn path_by_index(&self, index: usize) -> Option<String> {
		self.state.read().location.segment(index).map(str::to_string)
	}

	fn set_lifecycle(&self, update: PageStateUpdate) {
		{
			let mut state = self.state.write();
			state.page_lifecycle = update.state;
			state.error = (update.state == PageLifecycle::Error).then(|| update.error.clone());
		}
		self.bus.publish(AppEvent::PageStateUpdate(update));
	}
}
