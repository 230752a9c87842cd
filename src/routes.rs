//! Route hierarchy and location resolution module.
//!
//! # Examples
//!
//! ```rust,no_run
//! use wayfinder::routes::{LocationResolver, RouteRecord, RouteTable};
//! ```

pub use wayfinder_routes::*;
