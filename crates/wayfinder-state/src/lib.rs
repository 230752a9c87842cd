//! Wayfinder State - application state coordination for single page applications
//!
//! This crate turns navigations into application state and announces every
//! change to independent UI listeners.
//!
//! ## Modules
//!
//! - [`bus`]: [`EventBus`] fanning [`AppEvent`]s out to listeners and async streams
//! - [`coordinator`]: [`AppStateCoordinator`], the only writer of [`ApplicationState`]
//! - [`loader`]: [`PageLoader`], loading each page bundle at most once
//! - [`service`]: wording of failed service requests
//! - [`config`]: [`AppConfig`] loaded from TOML or JSON
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use wayfinder_routes::{Location, RouteRecord, RouteTable};
//! use wayfinder_state::{AppEvent, AppStateCoordinator, EventBus, EventKind};
//!
//! let table = RouteTable::new([
//!     RouteRecord::home("home", "page-home").with_breadcrumb("Home"),
//!     RouteRecord::new("reports", "page-reports", "reports").with_title("Reports"),
//! ])
//! .unwrap();
//! let bus = Arc::new(EventBus::new());
//! bus.subscribe_to([EventKind::RouteIdUpdate], |event| {
//!     if let AppEvent::RouteIdUpdate(update) = event {
//!         assert_eq!(update.route_id, "reports");
//!     }
//! });
//!
//! let coordinator = AppStateCoordinator::new(Arc::new(table), bus);
//! coordinator.on_location_change(Location::new(["reports"]));
//! assert_eq!(coordinator.snapshot().page, "page-reports");
//! ```

#![warn(missing_docs)]

pub mod bus;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod loader;
pub mod request;
pub mod service;
pub mod session;
pub mod shell;
pub mod state;

pub use bus::{DEFAULT_STREAM_CAPACITY, EventBus, SubscribeOptions, SubscriptionId};
pub use config::{AppConfig, AuthConfig};
pub use coordinator::{AppStateCoordinator, PAGE_NOT_FOUND_MESSAGE, TOAST_DISMISSED_MESSAGE};
pub use error::{BundleError, BundleResult, ConfigError, ConfigResult};
pub use event::{
	AlertBanner, AppEvent, BreadcrumbUpdate, DialogAction, DialogButton, DialogOpen, EventKind,
	PageError, PageLifecycle, PageStateUpdate, PageTitle, RouteIdUpdate, Toast, ToastDismiss,
	ToastKind,
};
pub use loader::{
	BUNDLE_LOAD_ERROR_HEADING, BundleRegistry, BundleResolver, LoadOutcome, PageLoader,
	StaticBundles,
};
pub use request::{BreadcrumbRequest, CrumbInput, DialogOptions, TitleRequest, ToastOptions};
pub use service::{
	ErrorOverrides, ErrorPayload, GENERIC_ERROR_MESSAGE, HttpFailure, RequestState,
	ServiceFailure, ServiceOutcome, ServiceResponse, find_service_error,
};
pub use session::SessionHandle;
pub use shell::AppShell;
pub use state::{ApplicationState, PAGE_NOT_LOADED};
