//! Route table error types.

use thiserror::Error;

/// Result type for route table operations.
pub type RouteResult<T> = Result<T, RouteError>;

/// Errors raised while building or mutating a [`RouteTable`](crate::RouteTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RouteError {
	/// A route record was declared with an empty `route_id`.
	#[error("route id must not be empty")]
	EmptyRouteId,

	/// Two route records share the same `route_id`.
	#[error("duplicate route id: {0}")]
	DuplicateRouteId(String),

	/// A non-home route has no path segment and could never be resolved.
	#[error("route '{0}' has an empty path segment")]
	EmptyPathSegment(String),

	/// A route names a parent that is not in the table.
	#[error("route '{route}' references unknown parent '{parent}'")]
	UnknownParent {
		/// Route declaring the parent.
		route: String,
		/// Missing parent id.
		parent: String,
	},

	/// More than one route is flagged as home.
	#[error("multiple home routes: '{first}' and '{second}'")]
	MultipleHomeRoutes {
		/// First home route encountered.
		first: String,
		/// Second home route encountered.
		second: String,
	},

	/// The home route cannot take part in the parent hierarchy.
	#[error("home route '{0}' cannot have a parent or children")]
	HomeInHierarchy(String),

	/// Two siblings share the same path segment.
	#[error("duplicate path segment '{segment}' under parent {parent:?}")]
	DuplicateSibling {
		/// Shared parent (`None` for top-level routes).
		parent: Option<String>,
		/// Conflicting segment.
		segment: String,
	},

	/// Following parents from this route loops back on itself.
	#[error("parent cycle detected at route '{0}'")]
	Cycle(String),

	/// The route id is not registered.
	#[error("route not found: {0}")]
	RouteNotFound(String),

	/// A location string could not be parsed.
	#[error("invalid location '{input}': {reason}")]
	InvalidLocation {
		/// Raw input.
		input: String,
		/// Parser message.
		reason: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_route_error_display() {
		assert_eq!(
			RouteError::DuplicateRouteId("foo".to_string()).to_string(),
			"duplicate route id: foo"
		);
		assert_eq!(
			RouteError::EmptyPathSegment("foo".to_string()).to_string(),
			"route 'foo' has an empty path segment"
		);
		assert_eq!(
			RouteError::UnknownParent {
				route: "bar".to_string(),
				parent: "foo".to_string(),
			}
			.to_string(),
			"route 'bar' references unknown parent 'foo'"
		);
		assert_eq!(
			RouteError::DuplicateSibling {
				parent: None,
				segment: "*".to_string(),
			}
			.to_string(),
			"duplicate path segment '*' under parent None"
		);
	}
}
