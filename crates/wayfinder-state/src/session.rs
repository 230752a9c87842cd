//! Session collaborator.

use wayfinder_routes::Location;

/// Authentication session consulted on every navigation.
///
/// Token acquisition and refresh live behind this trait; the coordinator
/// only asks whether a location is a logout request and, if so, ends the
/// session.
pub trait SessionHandle: Send + Sync {
	/// Whether navigating to `location` means the user asked to log out.
	fn log_out_requested(&self, location: &Location) -> bool;

	/// Ends the session. Usually redirects away from the application.
	fn logout(&self);
}
