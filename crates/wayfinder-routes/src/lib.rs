//! Wayfinder Routes - declarative route hierarchy for single page applications
//!
//! This crate holds the pure part of client-side navigation: a validated
//! forest of routes, location parsing and path resolution. It has no side
//! effects and no async runtime requirements.
//!
//! ## Modules
//!
//! - [`route`]: Route records and per-route overrides
//! - [`table`]: The [`RouteTable`] with resolution, links and breadcrumbs
//! - [`location`]: [`Location`] parsing and fragment cleanup
//! - [`resolver`]: [`LocationResolver`] matching locations to routes
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use wayfinder_routes::{LocationResolver, RouteRecord, RouteTable, WILDCARD};
//!
//! let table = RouteTable::new([
//!     RouteRecord::home("home", "page-home").with_breadcrumb("Home"),
//!     RouteRecord::new("foo", "page-foo", "foo").with_breadcrumb("Foo"),
//!     RouteRecord::new("foo-detail", "page-foo", WILDCARD)
//!         .with_parent("foo")
//!         .with_breadcrumb("Detail"),
//! ])
//! .unwrap();
//!
//! let resolver = LocationResolver::new(Arc::new(table));
//! let resolution = resolver.resolve_path("/foo/42").unwrap();
//! assert_eq!(resolution.route_id(), "foo-detail");
//! assert_eq!(resolution.breadcrumbs(false)[2].link, "/foo/42");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod location;
pub mod resolver;
pub mod route;
pub mod table;

pub use error::{RouteError, RouteResult};
pub use location::{IDENTITY_PROVIDER_HASH_KEYS, Location};
pub use resolver::{LocationResolver, Resolution};
pub use route::{OverrideKind, Route, RouteRecord, TextOverride, WILDCARD};
pub use table::{Breadcrumb, RouteTable};
