//! Property-based tests for route resolution
//!
//! Uses proptest to verify, over randomly shaped route forests:
//! 1. `resolve(path_segments(id))` returns the route `id`
//! 2. Breadcrumb trails have one entry per route in the chain, plus home
//! 3. Links are built root first and always start with `/`

use proptest::prelude::*;
use wayfinder_routes::{RouteRecord, RouteTable, WILDCARD};

/// Builds a forest where route `i` hangs under `parents[i]` (if it points to
/// an earlier route). Each parent gets at most one wildcard child.
fn build_table(shape: &[(Option<usize>, bool)]) -> (RouteTable, Vec<usize>) {
	let mut records = vec![RouteRecord::home("home", "page-home").with_breadcrumb("Home")];
	let mut depths = Vec::with_capacity(shape.len());
	let mut wildcard_parents = std::collections::HashSet::new();

	for (index, (parent, wildcard)) in shape.iter().enumerate() {
		let parent = (*parent).filter(|&p| p < index);
		let segment = if *wildcard && wildcard_parents.insert(parent) {
			WILDCARD.to_string()
		} else {
			format!("seg{}", index)
		};
		let mut record = RouteRecord::new(format!("r{}", index), format!("page-{}", index), segment)
			.with_breadcrumb(format!("Route {}", index));
		let depth = match parent {
			Some(p) => {
				record = record.with_parent(format!("r{}", p));
				depths[p] + 1
			}
			None => 1,
		};
		depths.push(depth);
		records.push(record);
	}

	(RouteTable::new(records).unwrap(), depths)
}

fn shape_strategy() -> impl Strategy<Value = Vec<(Option<usize>, bool)>> {
	prop::collection::vec((prop::option::of(0usize..16), any::<bool>()), 1..16)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	/// Property: every route is reached by its own path segments
	#[test]
	fn test_resolve_round_trip(shape in shape_strategy()) {
		let (table, _) = build_table(&shape);

		for route in table.iter() {
			let segments = table.path_segments(route.route_id());
			let resolved = table.resolve(segments.as_slice());
			prop_assert_eq!(resolved.map(|r| r.route_id()), Some(route.route_id()));
		}
	}

	/// Property: trail length is chain depth plus one for home
	#[test]
	fn test_breadcrumb_trail_length(shape in shape_strategy()) {
		let (table, depths) = build_table(&shape);

		for (index, depth) in depths.iter().enumerate() {
			let route_id = format!("r{}", index);
			let with_home = table.breadcrumb_trail(&route_id, false);
			let without_home = table.breadcrumb_trail(&route_id, true);

			prop_assert_eq!(with_home.len(), depth + 1);
			prop_assert_eq!(without_home.len(), *depth);
			prop_assert_eq!(with_home[0].link.as_str(), "/");
			prop_assert!(with_home.iter().all(|b| b.link.starts_with('/')));
			prop_assert_eq!(
				with_home.last().map(|b| b.link.clone()),
				table.page_link(&route_id)
			);
		}
	}
}
