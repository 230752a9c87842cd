//! The route table.
//!
//! Routes form a forest: every route has at most one parent and the full
//! path of a route is the concatenation of the segments from its root down
//! to itself. The home route sits outside the forest and answers the empty
//! path.

use super::error::{RouteError, RouteResult};
use super::route::{OverrideKind, Route, RouteRecord, TextOverride, WILDCARD};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A single breadcrumb entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breadcrumb {
	/// Display text.
	pub text: String,
	/// Absolute link, always starting with `/`.
	pub link: String,
}

impl Breadcrumb {
	/// Creates a breadcrumb.
	pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			link: link.into(),
		}
	}
}

/// Immutable route hierarchy with resolution and link building.
///
/// The hierarchy is validated on construction; only overrides can be added
/// afterwards, through [`RouteTable::set_override`] and friends.
#[derive(Debug, Default)]
pub struct RouteTable {
	routes: Vec<Route>,
	by_id: HashMap<String, usize>,
	children: HashMap<Option<String>, Vec<usize>>,
	home: Option<usize>,
}

impl RouteTable {
	/// Builds a table from route records.
	///
	/// # Errors
	///
	/// Fails when ids are empty or duplicated, a non-home route has an empty
	/// path segment, a parent is unknown, more than one home route exists, the home route takes part in the hierarchy, two
	/// siblings share a segment, or the parent links contain a cycle.
	pub fn new<I>(records: I) -> RouteResult<Self>
	where
		I: IntoIterator<Item = RouteRecord>,
	{
		let mut table = Self::default();

		for record in records {
			if record.route_id.is_empty() {
				return Err(RouteError::EmptyRouteId);
			}
			if table.by_id.contains_key(&record.route_id) {
				return Err(RouteError::DuplicateRouteId(record.route_id));
			}
			if !record.is_home && record.path_segment.is_empty() {
				return Err(RouteError::EmptyPathSegment(record.route_id));
			}
			let index = table.routes.len();
			if record.is_home {
				if let Some(existing) = table.home {
					return Err(RouteError::MultipleHomeRoutes {
						first: table.routes[existing].route_id().to_string(),
						second: record.route_id,
					});
				}
				if record.parent.is_some() {
					return Err(RouteError::HomeInHierarchy(record.route_id));
				}
				table.home = Some(index);
			}
			table.by_id.insert(record.route_id.clone(), index);
			table.routes.push(Route::from(record));
		}

		table.link_children()?;
		table.check_cycles()?;

		tracing::debug!(routes = table.routes.len(), "route table built");
		Ok(table)
	}

	fn link_children(&mut self) -> RouteResult<()> {
		let mut seen: HashSet<(Option<&str>, &str)> = HashSet::new();
		let mut children: HashMap<Option<String>, Vec<usize>> = HashMap::new();

		for (index, route) in self.routes.iter().enumerate() {
			if route.is_home() {
				continue;
			}
			if let Some(parent) = route.parent() {
				let parent_index = self.by_id.get(parent).copied().ok_or_else(|| {
					RouteError::UnknownParent {
						route: route.route_id().to_string(),
						parent: parent.to_string(),
					}
				})?;
				if self.routes[parent_index].is_home() {
					return Err(RouteError::HomeInHierarchy(parent.to_string()));
				}
			}
			if !seen.insert((route.parent(), route.path_segment())) {
				return Err(RouteError::DuplicateSibling {
					parent: route.parent().map(str::to_string),
					segment: route.path_segment().to_string(),
				});
			}
			children
				.entry(route.parent().map(str::to_string))
				.or_default()
				.push(index);
		}

		self.children = children;
		Ok(())
	}

	fn check_cycles(&self) -> RouteResult<()> {
		for route in &self.routes {
			let mut cursor = route.parent();
			let mut steps = 0;
			while let Some(parent) = cursor {
				steps += 1;
				if steps > self.routes.len() {
					return Err(RouteError::Cycle(route.route_id().to_string()));
				}
				cursor = self.by_route_id(parent).and_then(Route::parent);
			}
		}
		Ok(())
	}

	/// Returns the number of routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether the table has no routes.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Iterates over routes in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &Route> {
		self.routes.iter()
	}

	/// Returns the home route.
	pub fn home(&self) -> Option<&Route> {
		self.home.map(|index| &self.routes[index])
	}

	/// Looks up a route by id.
	pub fn by_route_id(&self, route_id: &str) -> Option<&Route> {
		self.by_id.get(route_id).map(|&index| &self.routes[index])
	}

	/// Looks up the first route rendering `page_id`.
	pub fn by_page_id(&self, page_id: &str) -> Option<&Route> {
		let route = self.routes.iter().find(|r| r.page_id() == page_id);
		if route.is_none() {
			tracing::warn!(page_id, "no route renders this page");
		}
		route
	}

	fn child(&self, parent: Option<&str>, segment: &str) -> Option<&Route> {
		self.children
			.get(&parent.map(str::to_string))?
			.iter()
			.map(|&index| &self.routes[index])
			.find(|route| route.path_segment() == segment)
	}

	/// Resolves path segments to a route.
	///
	/// Empty segments are ignored. An empty path resolves to the home route.
	/// At each depth a literal match wins over the wildcard sibling; there is
	/// no backtracking once a branch has been chosen.
	pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Route> {
		let mut matched = None;
		let mut parent: Option<&str> = None;

		for segment in segments.iter().map(AsRef::<str>::as_ref).filter(|s| !s.is_empty()) {
			let route = self
				.child(parent, segment)
				.or_else(|| self.child(parent, WILDCARD))?;
			parent = Some(route.route_id());
			matched = Some(route);
		}

		match matched {
			Some(route) => Some(route),
			None => self.home(),
		}
	}

	/// Returns the route and its ancestors, root first.
	fn chain(&self, route_id: &str) -> Vec<&Route> {
		let mut chain = Vec::new();
		let mut cursor = self.by_route_id(route_id);
		while let Some(route) = cursor {
			chain.push(route);
			cursor = route.parent().and_then(|parent| self.by_route_id(parent));
		}
		chain.reverse();
		chain
	}

	/// Effective path segments of a route, root first.
	///
	/// Path-segment overrides are honored. The home route has no segments.
	pub fn path_segments(&self, route_id: &str) -> Vec<String> {
		self.chain(route_id)
			.into_iter()
			.filter(|route| !route.is_home())
			.map(Route::effective_path_segment)
			.collect()
	}

	/// Static path segments of a route, root first, ignoring overrides.
	pub fn path_segments_raw(&self, route_id: &str) -> Vec<String> {
		self.chain(route_id)
			.into_iter()
			.filter(|route| !route.is_home())
			.map(|route| route.path_segment().to_string())
			.collect()
	}

	/// Absolute link to a route, e.g. `/foo/bar`.
	pub fn page_link(&self, route_id: &str) -> Option<String> {
		self.by_route_id(route_id)?;
		Some(join_link(&self.path_segments(route_id)))
	}

	/// Breadcrumb trail for a route, home first unless `exclude_home`.
	///
	/// Wildcard segments appear as `*` in the links; use
	/// [`RouteTable::breadcrumb_trail_for`] to echo the segments of a concrete
	/// location instead.
	pub fn breadcrumb_trail(&self, route_id: &str, exclude_home: bool) -> Vec<Breadcrumb> {
		self.breadcrumb_trail_for::<&str>(route_id, exclude_home, &[])
	}

	/// Breadcrumb trail for a route reached through `actual` segments.
	///
	/// A wildcard route without a path-segment override links with the
	/// segment the user actually visited at that depth.
	pub fn breadcrumb_trail_for<S: AsRef<str>>(
		&self,
		route_id: &str,
		exclude_home: bool,
		actual: &[S],
	) -> Vec<Breadcrumb> {
		let chain = self.chain(route_id);
		if chain.is_empty() {
			return Vec::new();
		}

		let mut trail = Vec::with_capacity(chain.len() + 1);
		if !exclude_home && let Some(home) = self.home() {
			trail.push(Breadcrumb::new(home.breadcrumb_text(), "/"));
		}

		let actual: Vec<&str> = actual
			.iter()
			.map(AsRef::<str>::as_ref)
			.filter(|s| !s.is_empty())
			.collect();
		let mut segments = Vec::with_capacity(chain.len());
		for (depth, route) in chain.into_iter().filter(|r| !r.is_home()).enumerate() {
			let echoed = route.is_wildcard() && !route.has_override(OverrideKind::PathSegment);
			let segment = match actual.get(depth) {
				Some(input) if echoed => (*input).to_string(),
				_ => route.effective_path_segment(),
			};
			segments.push(segment);
			trail.push(Breadcrumb::new(route.breadcrumb_text(), join_link(&segments)));
		}

		trail
	}

	/// Effective page title of a route.
	pub fn title(&self, route_id: &str) -> Option<String> {
		self.by_route_id(route_id).map(Route::title)
	}

	/// Effective breadcrumb text of a route.
	pub fn breadcrumb_text(&self, route_id: &str) -> Option<String> {
		self.by_route_id(route_id).map(Route::breadcrumb_text)
	}

	/// Effective path segment of a route.
	pub fn path_segment(&self, route_id: &str) -> Option<String> {
		self.by_route_id(route_id).map(Route::effective_path_segment)
	}

	/// Installs an override on a registered route.
	///
	/// Returns `Ok(false)` when an override of that kind was already installed;
	/// the first one stays in effect.
	///
	/// # Errors
	///
	/// Returns [`RouteError::RouteNotFound`] for unknown route ids.
	pub fn set_override<F, T>(&self, route_id: &str, kind: OverrideKind, f: F) -> RouteResult<bool>
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Option<String>>,
	{
		let route = self
			.by_route_id(route_id)
			.ok_or_else(|| RouteError::RouteNotFound(route_id.to_string()))?;
		let f: TextOverride = Arc::new(move || -> Option<String> { f().into() });
		let installed = route.install_override(kind, f);
		if !installed {
			tracing::debug!(route_id, %kind, "override already installed, keeping the first");
		}
		Ok(installed)
	}

	/// Installs a dynamic page title.
	pub fn set_title_override<F, T>(&self, route_id: &str, f: F) -> RouteResult<bool>
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Option<String>>,
	{
		self.set_override(route_id, OverrideKind::Title, f)
	}

	/// Installs a dynamic breadcrumb text.
	pub fn set_breadcrumb_override<F, T>(&self, route_id: &str, f: F) -> RouteResult<bool>
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Option<String>>,
	{
		self.set_override(route_id, OverrideKind::Breadcrumb, f)
	}

	/// Installs a dynamic path segment.
	pub fn set_path_segment_override<F, T>(&self, route_id: &str, f: F) -> RouteResult<bool>
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Option<String>>,
	{
		self.set_override(route_id, OverrideKind::PathSegment, f)
	}

	/// Static segments of top-level, non-home routes.
	///
	/// A server serving the application shell forwards these first segments
	/// to the shell instead of treating them as missing resources.
	pub fn spa_top_level_segments(&self) -> Vec<&str> {
		self.routes
			.iter()
			.filter(|route| route.parent().is_none() && !route.is_home())
			.map(Route::path_segment)
			.collect()
	}
}

fn join_link(segments: &[String]) -> String {
	format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn table() -> RouteTable {
		RouteTable::new([
			RouteRecord::home("home", "page-home").with_breadcrumb("Home"),
			RouteRecord::new("foo", "page-foo", "foo")
				.with_title("Foo")
				.with_breadcrumb("Foo"),
			RouteRecord::new("foobar", "page-foo", WILDCARD)
				.with_parent("foo")
				.with_title("Foo Detail")
				.with_breadcrumb("Foo Detail"),
			RouteRecord::new("foo-new", "page-foo-new", "new")
				.with_parent("foo")
				.with_breadcrumb("New Foo"),
			RouteRecord::new("admin", "page-admin", "admin").with_breadcrumb("Admin"),
		])
		.unwrap()
	}

	#[rstest]
	fn test_resolve_empty_is_home(table: RouteTable) {
		let route = table.resolve::<&str>(&[]).unwrap();
		assert_eq!(route.route_id(), "home");

		let route = table.resolve(&["", ""]).unwrap();
		assert_eq!(route.route_id(), "home");
	}

	#[rstest]
	#[case(&["foo"], "foo")]
	#[case(&["foo", "new"], "foo-new")]
	#[case(&["foo", "42"], "foobar")]
	#[case(&["admin"], "admin")]
	fn test_resolve_matches(table: RouteTable, #[case] path: &[&str], #[case] expected: &str) {
		assert_eq!(table.resolve(path).unwrap().route_id(), expected);
	}

	#[rstest]
	#[case(&["bar"])]
	#[case(&["foo", "42", "extra"])]
	#[case(&["admin", "users"])]
	fn test_resolve_fails(table: RouteTable, #[case] path: &[&str]) {
		assert!(table.resolve(path).is_none());
	}

	#[rstest]
	fn test_path_segments(table: RouteTable) {
		assert_eq!(table.path_segments("foo-new"), vec!["foo", "new"]);
		assert_eq!(table.path_segments("foobar"), vec!["foo", "*"]);
		assert!(table.path_segments("home").is_empty());
		assert!(table.path_segments("missing").is_empty());
	}

	#[rstest]
	fn test_page_link(table: RouteTable) {
		assert_eq!(table.page_link("home").as_deref(), Some("/"));
		assert_eq!(table.page_link("foo-new").as_deref(), Some("/foo/new"));
		assert!(table.page_link("missing").is_none());
	}

	#[rstest]
	fn test_breadcrumb_trail(table: RouteTable) {
		// Arrange
		let expected = vec![
			Breadcrumb::new("Home", "/"),
			Breadcrumb::new("Foo", "/foo"),
			Breadcrumb::new("New Foo", "/foo/new"),
		];

		// Act
		let trail = table.breadcrumb_trail("foo-new", false);

		// Assert
		assert_eq!(trail, expected);
		assert_eq!(table.breadcrumb_trail("foo-new", true), expected[1..].to_vec());
	}

	#[rstest]
	fn test_breadcrumb_trail_for_home(table: RouteTable) {
		assert_eq!(
			table.breadcrumb_trail("home", false),
			vec![Breadcrumb::new("Home", "/")]
		);
		assert!(table.breadcrumb_trail("home", true).is_empty());
		assert!(table.breadcrumb_trail("missing", false).is_empty());
	}

	#[rstest]
	fn test_breadcrumb_trail_echoes_wildcard(table: RouteTable) {
		let trail = table.breadcrumb_trail_for("foobar", false, &["foo", "anything"]);
		let links: Vec<&str> = trail.iter().map(|b| b.link.as_str()).collect();
		assert_eq!(links, vec!["/", "/foo", "/foo/anything"]);
	}

	#[rstest]
	fn test_overrides(table: RouteTable) {
		// Arrange
		assert!(table.set_title_override("foobar", || "Foo #42".to_string()).unwrap());
		assert!(table.set_path_segment_override("foobar", || "42".to_string()).unwrap());

		// Act
		let title = table.title("foobar");
		let link = table.page_link("foobar");

		// Assert
		assert_eq!(title.as_deref(), Some("Foo #42"));
		assert_eq!(link.as_deref(), Some("/foo/42"));
		assert_eq!(table.path_segments_raw("foobar"), vec!["foo", "*"]);
	}

	#[rstest]
	fn test_override_unknown_route(table: RouteTable) {
		let result = table.set_breadcrumb_override("missing", || "x".to_string());
		assert_eq!(result, Err(RouteError::RouteNotFound("missing".to_string())));
	}

	#[rstest]
	fn test_spa_top_level_segments(table: RouteTable) {
		assert_eq!(table.spa_top_level_segments(), vec!["foo", "admin"]);
	}

	#[rstest]
	fn test_by_page_id(table: RouteTable) {
		assert_eq!(table.by_page_id("page-foo").unwrap().route_id(), "foo");
		assert!(table.by_page_id("page-missing").is_none());
	}

	#[rstest]
	fn test_rejects_duplicate_id() {
		let result = RouteTable::new([
			RouteRecord::new("foo", "a", "foo"),
			RouteRecord::new("foo", "b", "bar"),
		]);
		assert_eq!(result.unwrap_err(), RouteError::DuplicateRouteId("foo".into()));
	}

	#[rstest]
	#[case::root(vec![RouteRecord::new("foo", "page-foo", "")])]
	#[case::child(vec![
		RouteRecord::new("bar", "page-bar", "bar"),
		RouteRecord::new("foo", "page-foo", "").with_parent("bar"),
	])]
	fn test_rejects_empty_segment(#[case] records: Vec<RouteRecord>) {
		// Act
		let result = RouteTable::new(records);

		// Assert
		assert_eq!(result.unwrap_err(), RouteError::EmptyPathSegment("foo".to_string()));
	}

	#[rstest]
	fn test_rejects_unknown_parent() {
		let result = RouteTable::new([RouteRecord::new("bar", "a", "bar").with_parent("foo")]);
		assert!(matches!(result, Err(RouteError::UnknownParent { .. })));
	}

	#[rstest]
	fn test_rejects_second_home() {
		let result = RouteTable::new([RouteRecord::home("a", "a"), RouteRecord::home("b", "b")]);
		assert!(matches!(result, Err(RouteError::MultipleHomeRoutes { .. })));
	}

	#[rstest]
	fn test_rejects_child_of_home() {
		let result = RouteTable::new([
			RouteRecord::home("home", "page-home"),
			RouteRecord::new("foo", "page-foo", "foo").with_parent("home"),
		]);
		assert_eq!(
			result.unwrap_err(),
			RouteError::HomeInHierarchy("home".to_string())
		);
	}

	#[rstest]
	fn test_rejects_duplicate_sibling() {
		let result = RouteTable::new([
			RouteRecord::new("a", "a", WILDCARD),
			RouteRecord::new("b", "b", WILDCARD),
		]);
		assert!(matches!(result, Err(RouteError::DuplicateSibling { .. })));
	}

	#[rstest]
	fn test_rejects_cycle() {
		let result = RouteTable::new([
			RouteRecord::new("a", "a", "a").with_parent("b"),
			RouteRecord::new("b", "b", "b").with_parent("a"),
		]);
		assert!(matches!(result, Err(RouteError::Cycle(_))));
	}
}
