//! # Wayfinder
//!
//! Client-side routing and application-state coordination for single page
//! applications.
//!
//! A navigation flows through four pieces:
//!
//! 1. The [`RouteTable`] holds the static route hierarchy.
//! 2. The [`LocationResolver`] matches a location against it.
//! 3. The [`AppStateCoordinator`] updates the application state and
//!    announces every change on the [`EventBus`].
//! 4. The [`PageLoader`] loads the bundle of the resolved page once and
//!    asks the coordinator to replay its state.
//!
//! ## Feature Flags
//!
//! - `state` - event bus, coordinator, page loader and configuration
//! - `full` (default) - everything
//!
//! Without `state` only the pure route table and resolution is built.
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "state")]
//! # {
//! use wayfinder::prelude::*;
//!
//! let config = AppConfig::from_toml_str(r#"
//! [[routes]]
//! route_id = "home"
//! page_id = "page-home"
//! is_home = true
//!
//! [[routes]]
//! route_id = "reports"
//! page_id = "page-reports"
//! path_segment = "reports"
//! page_title = "Reports"
//!
//! [bundles]
//! core = ["page-home", "page-reports"]
//! "#).unwrap();
//!
//! let resolver = Arc::new(StaticBundles::from_registry(&config.bundle_registry().unwrap()));
//! let shell = AppShell::new(config, resolver, None).unwrap();
//! shell.coordinator().navigate("/reports");
//! assert_eq!(shell.coordinator().snapshot().page, "page-reports");
//! # }
//! ```

pub mod routes;
pub mod state;

pub use wayfinder_routes::{
	Breadcrumb, Location, LocationResolver, Resolution, Route, RouteError, RouteRecord,
	RouteResult, RouteTable, WILDCARD,
};

#[cfg(feature = "state")]
pub use wayfinder_state::{
	AppConfig, AppEvent, AppShell, AppStateCoordinator, ApplicationState, BundleError,
	BundleRegistry, BundleResolver, ConfigError, EventBus, EventKind, PageLifecycle, PageLoader,
	SessionHandle,
};

/// Commonly used types.
pub mod prelude {
	pub use crate::{
		Breadcrumb, Location, LocationResolver, RouteError, RouteRecord, RouteTable, WILDCARD,
	};

	pub use std::sync::Arc;

	#[cfg(feature = "state")]
	pub use crate::{
		AppConfig, AppEvent, AppShell, AppStateCoordinator, ApplicationState, BundleRegistry,
		BundleResolver, EventBus, EventKind, PageLifecycle, PageLoader, SessionHandle,
	};

	#[cfg(feature = "state")]
	pub use wayfinder_state::{
		CrumbInput, DialogOptions, ErrorOverrides, PageError, PageTitle, ServiceResponse,
		StaticBundles, ToastOptions,
	};
}
