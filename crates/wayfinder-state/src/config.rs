//! Application configuration.
//!
//! An [`AppConfig`] declares the route hierarchy and the bundles pages are
//! split into. It is read from TOML or JSON, picked by file extension:
//!
//! ```toml
//! title = "Inventory"
//!
//! [auth]
//! require_auth = true
//!
//! [[routes]]
//! route_id = "home"
//! page_id = "page-home"
//! is_home = true
//! breadcrumb_text = "Home"
//!
//! [[routes]]
//! route_id = "items"
//! page_id = "page-items"
//! path_segment = "items"
//! page_title = "Items"
//!
//! [bundles]
//! core = ["page-home", "page-items"]
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::loader::BundleRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use wayfinder_routes::{RouteRecord, RouteTable};

/// Authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
	/// Whether navigation requires a session.
	#[serde(default, alias = "requireAuth")]
	pub require_auth: bool,
}

/// Declarative application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
	/// Application title.
	#[serde(default)]
	pub title: String,
	/// Route hierarchy.
	#[serde(default, alias = "routeConfig")]
	pub routes: Vec<RouteRecord>,
	/// Bundle key to the page ids it serves.
	#[serde(default)]
	pub bundles: IndexMap<String, Vec<String>>,
	/// Authentication settings.
	#[serde(default)]
	pub auth: AuthConfig,
}

impl AppConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
		let config: Self = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Parses and validates a JSON document.
	pub fn from_json_str(content: &str) -> ConfigResult<Self> {
		let config: Self = serde_json::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads a `.toml` or `.json` file.
	pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
		let path = path.as_ref();
		let ext = path.extension().and_then(|e| e.to_str());
		let read = || {
			fs::read_to_string(path).map_err(|source| ConfigError::Io {
				path: path.to_path_buf(),
				source,
			})
		};

		let config = match ext {
			Some("toml") => Self::from_toml_str(&read()?)?,
			Some("json") => Self::from_json_str(&read()?)?,
			_ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
		};
		tracing::info!(
			path = %path.display(),
			routes = config.routes.len(),
			bundles = config.bundles.len(),
			"loaded application configuration"
		);
		Ok(config)
	}

	/// Checks the route hierarchy and bundle assignment.
	///
	/// # Errors
	///
	/// Any [`RouteError`](wayfinder_routes::RouteError) of the route table,
	/// an empty bundle key, or a page listed in two bundles.
	pub fn validate(&self) -> ConfigResult<()> {
		let table = self.route_table()?;
		self.bundle_registry()?;

		for page in self.bundles.values().flatten() {
			if !table.iter().any(|route| route.page_id() == page) {
				tracing::warn!(page_id = %page, "bundle lists a page no route renders");
			}
		}
		Ok(())
	}

	/// Builds the route table.
	pub fn route_table(&self) -> ConfigResult<RouteTable> {
		Ok(RouteTable::new(self.routes.iter().cloned())?)
	}

	/// Builds the page-to-bundle registry.
	pub fn bundle_registry(&self) -> ConfigResult<BundleRegistry> {
		let mut owners: HashMap<&str, &str> = HashMap::new();
		let mut registry = BundleRegistry::new();

		for (bundle, pages) in &self.bundles {
			if bundle.is_empty() {
				return Err(ConfigError::EmptyBundleKey);
			}
			for page in pages {
				if let Some(first) = owners.insert(page, bundle)
					&& first != bundle.as_str()
				{
					return Err(ConfigError::DuplicateBundlePage {
						page: page.clone(),
						first: first.to_string(),
						second: bundle.clone(),
					});
				}
			}
			registry = registry.with_bundle(bundle.clone(), pages.iter().cloned());
		}
		Ok(registry)
	}
}
