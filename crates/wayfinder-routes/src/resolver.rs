//! Location resolution.
//!
//! [`LocationResolver`] turns a [`Location`] into a [`Resolution`]: the
//! matched route together with the segments that reached it, so that links
//! for wildcard routes can echo what the user actually visited.

use super::location::Location;
use super::route::Route;
use super::table::{Breadcrumb, RouteTable};
use std::sync::Arc;

/// A successful match of a location against the route table.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
	table: &'a RouteTable,
	route: &'a Route,
	segments: Vec<String>,
}

impl<'a> Resolution<'a> {
	/// The matched route.
	pub fn route(&self) -> &'a Route {
		self.route
	}

	/// Route id of the matched route.
	pub fn route_id(&self) -> &'a str {
		self.route.route_id()
	}

	/// Page id of the matched route.
	pub fn page_id(&self) -> &'a str {
		self.route.page_id()
	}

	/// Segments that were matched.
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Effective title of the matched route.
	pub fn title(&self) -> String {
		self.route.title()
	}

	/// Breadcrumb trail, with wildcard positions echoing the visited segments.
	pub fn breadcrumbs(&self, exclude_home: bool) -> Vec<Breadcrumb> {
		self.table
			.breadcrumb_trail_for(self.route.route_id(), exclude_home, &self.segments)
	}
}

/// Resolves locations against a shared route table.
#[derive(Debug, Clone)]
pub struct LocationResolver {
	table: Arc<RouteTable>,
}

impl LocationResolver {
	/// Creates a resolver over `table`.
	pub fn new(table: Arc<RouteTable>) -> Self {
		Self { table }
	}

	/// Returns the underlying table.
	pub fn table(&self) -> &Arc<RouteTable> {
		&self.table
	}

	/// Resolves raw path segments.
	pub fn resolve_segments<S: AsRef<str>>(&self, segments: &[S]) -> Option<Resolution<'_>> {
		let segments: Vec<String> = segments
			.iter()
			.map(AsRef::<str>::as_ref)
			.filter(|s| !s.is_empty())
			.map(str::to_string)
			.collect();
		let route = self.table.resolve(segments.as_slice());
		if route.is_none() {
			tracing::debug!(path = %format!("/{}", segments.join("/")), "no route matches path");
		}
		Some(Resolution {
			table: self.table.as_ref(),
			route: route?,
			segments,
		})
	}

	/// Resolves a location.
	pub fn resolve(&self, location: &Location) -> Option<Resolution<'_>> {
		self.resolve_segments(location.path.as_slice())
	}

	/// Resolves a slash-separated path such as `/foo/bar`.
	pub fn resolve_path(&self, path: &str) -> Option<Resolution<'_>> {
		let segments: Vec<&str> = path.split('/').collect();
		self.resolve_segments(segments.as_slice())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::route::{RouteRecord, WILDCARD};
	use rstest::{fixture, rstest};

	#[fixture]
	fn resolver() -> LocationResolver {
		let table = RouteTable::new([
			RouteRecord::home("home", "page-home").with_breadcrumb("Home"),
			RouteRecord::new("foo", "page-foo", "foo").with_breadcrumb("Foo"),
			RouteRecord::new("foobar", "page-foobar", WILDCARD)
				.with_parent("foo")
				.with_breadcrumb("Foobar"),
		])
		.unwrap();
		LocationResolver::new(Arc::new(table))
	}

	#[rstest]
	fn test_resolve_location(resolver: LocationResolver) {
		let location = Location::new(["foo", "anything"]);

		let resolution = resolver.resolve(&location).unwrap();

		assert_eq!(resolution.route_id(), "foobar");
		assert_eq!(resolution.page_id(), "page-foobar");
		assert_eq!(resolution.segments(), &["foo", "anything"]);
	}

	#[rstest]
	fn test_resolution_breadcrumbs_echo_input(resolver: LocationResolver) {
		let resolution = resolver.resolve_path("/foo/anything").unwrap();

		assert_eq!(
			resolution.breadcrumbs(false),
			vec![
				Breadcrumb::new("Home", "/"),
				Breadcrumb::new("Foo", "/foo"),
				Breadcrumb::new("Foobar", "/foo/anything"),
			]
		);
	}

	#[rstest]
	fn test_resolve_path_root(resolver: LocationResolver) {
		assert_eq!(resolver.resolve_path("/").unwrap().route_id(), "home");
		assert_eq!(resolver.resolve_path("").unwrap().route_id(), "home");
	}

	#[rstest]
	fn test_resolve_unknown(resolver: LocationResolver) {
		assert!(resolver.resolve_path("/bar").is_none());
	}
}
