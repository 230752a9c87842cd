//! Error types for application state, configuration and bundle loading.

use std::path::PathBuf;
use thiserror::Error;
use wayfinder_routes::RouteError;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for bundle loading.
pub type BundleResult<T> = Result<T, BundleError>;

/// Errors raised while loading or validating an [`AppConfig`](crate::AppConfig).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// Reading a configuration file failed.
	#[error("failed to read configuration file {}: {source}", .path.display())]
	Io {
		/// File that could not be read.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// TOML syntax or shape error.
	#[error("invalid TOML configuration: {0}")]
	Toml(#[from] toml::de::Error),

	/// JSON syntax or shape error.
	#[error("invalid JSON configuration: {0}")]
	Json(#[from] serde_json::Error),

	/// The file extension does not name a supported format.
	#[error("unsupported configuration format: {}", .0.display())]
	UnsupportedFormat(PathBuf),

	/// The route records do not form a valid table.
	#[error("invalid route configuration: {0}")]
	Routes(#[from] RouteError),

	/// A page is listed under more than one bundle.
	#[error("page '{page}' is listed in bundles '{first}' and '{second}'")]
	DuplicateBundlePage {
		/// Page id listed twice.
		page: String,
		/// First bundle claiming the page.
		first: String,
		/// Second bundle claiming the page.
		second: String,
	},

	/// A bundle key is empty.
	#[error("bundle key must not be empty")]
	EmptyBundleKey,
}

/// Errors raised while loading a page bundle.
///
/// Cloneable so that every caller sharing one memoized load observes the
/// same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BundleError {
	/// The resolver does not know the bundle key.
	#[error("unknown bundle: {0}")]
	UnknownBundle(String),

	/// The resolver failed to load the bundle.
	#[error("failed to load bundle '{bundle}': {reason}")]
	LoadFailed {
		/// Bundle key.
		bundle: String,
		/// Resolver-provided reason.
		reason: String,
	},
}

impl BundleError {
	/// Creates a [`BundleError::LoadFailed`].
	pub fn load_failed(bundle: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::LoadFailed {
			bundle: bundle.into(),
			reason: reason.into(),
		}
	}
}
