//! Application state, events and lazy page loading module.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "state")]
//! use wayfinder::state::{AppStateCoordinator, EventBus, PageLoader};
//! ```

#[cfg(feature = "state")]
pub use wayfinder_state::*;
