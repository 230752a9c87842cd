//! Wiring of the coordinator, bus and loader from configuration.

use crate::bus::EventBus;
use crate::config::AppConfig;
use crate::coordinator::AppStateCoordinator;
use crate::error::ConfigResult;
use crate::loader::{BundleResolver, PageLoader};
use crate::session::SessionHandle;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A configured application: one bus, one coordinator, one page loader.
#[derive(Debug)]
pub struct AppShell {
	config: AppConfig,
	bus: Arc<EventBus>,
	coordinator: Arc<AppStateCoordinator>,
	loader: Arc<PageLoader>,
}

impl AppShell {
	/// Builds the application described by `config`.
	///
	/// # Errors
	///
	/// Fails when the routes or bundles of `config` are invalid.
	pub fn new(
		config: AppConfig,
		resolver: Arc<dyn BundleResolver>,
		session: Option<Arc<dyn SessionHandle>>,
	) -> ConfigResult<Self> {
		let table = Arc::new(config.route_table()?);
		let registry = config.bundle_registry()?;
		let bus = Arc::new(EventBus::new());

		let mut coordinator = AppStateCoordinator::new(table, Arc::clone(&bus));
		match session {
			Some(session) => coordinator = coordinator.with_session(session),
			None if config.auth.require_auth => {
				tracing::warn!("authentication required but no session configured");
			}
			None => {}
		}

		tracing::debug!(
			title = %config.title,
			routes = config.routes.len(),
			bundles = registry.len(),
			"application shell ready"
		);

		Ok(Self {
			bus,
			coordinator: Arc::new(coordinator),
			loader: Arc::new(PageLoader::new(registry, resolver)),
			config,
		})
	}

	/// The configuration the shell was built from.
	pub fn config(&self) -> &AppConfig {
		&self.config
	}

	/// The event bus.
	pub fn bus(&self) -> &Arc<EventBus> {
		&self.bus
	}

	/// The state coordinator.
	pub fn coordinator(&self) -> &Arc<AppStateCoordinator> {
		&self.coordinator
	}

	/// The page loader.
	pub fn loader(&self) -> &Arc<PageLoader> {
		&self.loader
	}

	/// Starts loading bundles in reaction to state updates.
	///
	/// The background task stops once the shell is dropped.
	pub fn start(&self) -> JoinHandle<()> {
		Arc::clone(&self.loader).spawn(&self.coordinator)
	}

	/// Navigates and waits until the page of the new state is loaded.
	///
	/// Returns the page that should render, or `None` when its bundle
	/// failed to load.
	pub async fn navigate(&self, url_or_path: &str) -> Option<String> {
		self.coordinator.navigate(url_or_path);
		let state = self.coordinator.snapshot();
		self.loader.handle_state(&self.coordinator, &state).await
	}
}
