//! Lazy page loading.
//!
//! Pages are grouped into bundles that are loaded on first use. The
//! [`PageLoader`] memoizes one shared load future per bundle, so concurrent
//! requests for pages of the same bundle trigger a single underlying load.

use crate::coordinator::AppStateCoordinator;
use crate::error::{BundleError, BundleResult};
use crate::event::{AppEvent, PageError};
use crate::state::{ApplicationState, PAGE_NOT_LOADED};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Heading shown when a bundle fails to load.
pub const BUNDLE_LOAD_ERROR_HEADING: &str = "Unable to load page";

/// Loads the code of a bundle.
#[async_trait]
pub trait BundleResolver: Send + Sync {
	/// Loads the bundle named `bundle`.
	async fn load_bundle(&self, bundle: &str) -> BundleResult<()>;
}

/// Assignment of page ids to bundle keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleRegistry {
	bundles: IndexMap<String, Vec<String>>,
	page_index: HashMap<String, String>,
}

impl BundleRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a bundle serving `pages`.
	///
	/// A page already assigned to another bundle keeps its first bundle.
	pub fn with_bundle<I, S>(mut self, bundle: impl Into<String>, pages: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let bundle = bundle.into();
		let pages: Vec<String> = pages.into_iter().map(Into::into).collect();
		for page in &pages {
			self.page_index
				.entry(page.clone())
				.or_insert_with(|| bundle.clone());
		}
		self.bundles.entry(bundle).or_default().extend(pages);
		self
	}

	/// Bundle serving `page_id`.
	pub fn bundle_for(&self, page_id: &str) -> Option<&str> {
		self.page_index.get(page_id).map(String::as_str)
	}

	/// Pages of `bundle`.
	pub fn pages(&self, bundle: &str) -> Option<&[String]> {
		self.bundles.get(bundle).map(Vec::as_slice)
	}

	/// Bundle keys in declaration order.
	pub fn bundles(&self) -> impl Iterator<Item = &str> {
		self.bundles.keys().map(String::as_str)
	}

	/// Number of bundles.
	pub fn len(&self) -> usize {
		self.bundles.len()
	}

	/// Whether the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.bundles.is_empty()
	}
}

/// Result of [`PageLoader::ensure_loaded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
	/// This call performed the first successful load of the bundle.
	Loaded {
		/// Bundle key.
		bundle: String,
	},
	/// The bundle had already been loaded, or was loaded by a concurrent
	/// call.
	AlreadyLoaded {
		/// Bundle key.
		bundle: String,
	},
	/// No bundle serves the page.
	UnknownPage,
}

type LoadFuture = Shared<BoxFuture<'static, BundleResult<()>>>;

/// Loads page bundles at most once.
///
/// A failed load is forgotten, so a later request for the same bundle
/// tries again. Successful loads are kept for the loader's lifetime.
pub struct PageLoader {
	registry: BundleRegistry,
	resolver: Arc<dyn BundleResolver>,
	loads: Mutex<HashMap<String, LoadFuture>>,
	active_page: watch::Sender<String>,
}

impl std::fmt::Debug for PageLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PageLoader")
			.field("registry", &self.registry)
			.field("loads", &self.loads.lock().len())
			.field("active_page", &*self.active_page.borrow())
			.finish()
	}
}

impl PageLoader {
	/// Creates a loader resolving bundles through `resolver`.
	pub fn new(registry: BundleRegistry, resolver: Arc<dyn BundleResolver>) -> Self {
		let (active_page, _) = watch::channel(PAGE_NOT_LOADED.to_string());
		Self {
			registry,
			resolver,
			loads: Mutex::new(HashMap::new()),
			active_page,
		}
	}

	/// Page-to-bundle assignment.
	pub fn registry(&self) -> &BundleRegistry {
		&self.registry
	}

	/// Whether `bundle` finished loading successfully.
	pub fn is_loaded(&self, bundle: &str) -> bool {
		self.loads
			.lock()
			.get(bundle)
			.and_then(Shared::peek)
			.is_some_and(Result::is_ok)
	}

	/// Receiver of the page that should currently render.
	pub fn active_page(&self) -> watch::Receiver<String> {
		self.active_page.subscribe()
	}

	/// Makes sure the bundle serving `page_id` is loaded.
	///
	/// # Errors
	///
	/// Returns the resolver's error. Every caller waiting on the same load
	/// receives it.
	pub async fn ensure_loaded(&self, page_id: &str) -> BundleResult<LoadOutcome> {
		let Some(bundle) = self.registry.bundle_for(page_id) else {
			if page_id != PAGE_NOT_LOADED {
				tracing::warn!(page_id, "no bundle serves page");
			}
			return Ok(LoadOutcome::UnknownPage);
		};

		let (load, first) = {
			let mut loads = self.loads.lock();
			match loads.get(bundle) {
				Some(load) => (load.clone(), false),
				None => {
					tracing::debug!(bundle, page_id, "loading bundle");
					let resolver = Arc::clone(&self.resolver);
					let key = bundle.to_string();
					let load = async move { resolver.load_bundle(&key).await }
						.boxed()
						.shared();
					loads.insert(bundle.to_string(), load.clone());
					(load, true)
				}
			}
		};

		match load.clone().await {
			Ok(()) if first => {
				tracing::info!(bundle, "bundle loaded");
				Ok(LoadOutcome::Loaded {
					bundle: bundle.to_string(),
				})
			}
			Ok(()) => Ok(LoadOutcome::AlreadyLoaded {
				bundle: bundle.to_string(),
			}),
			Err(e) => {
				let mut loads = self.loads.lock();
				// A retry may already have replaced the failed entry
				if loads.get(bundle).is_some_and(|current| current.ptr_eq(&load)) {
					loads.remove(bundle);
				}
				Err(e)
			}
		}
	}

	/// Reacts to an application state snapshot.
	///
	/// Loads the bundle of `state.page`. After the first successful load the
	/// coordinator re-announces its state so that the freshly loaded page
	/// sees it. A failed load is shown as a page error and the active page
	/// is left unchanged.
	///
	/// Returns the page that should render, if it changed or stayed valid.
	pub async fn handle_state(
		&self,
		coordinator: &AppStateCoordinator,
		state: &ApplicationState,
	) -> Option<String> {
		match self.ensure_loaded(&state.page).await {
			Ok(LoadOutcome::Loaded { .. }) => {
				self.activate(&state.page);
				coordinator.refresh();
				Some(state.page.clone())
			}
			Ok(LoadOutcome::AlreadyLoaded { .. } | LoadOutcome::UnknownPage) => {
				self.activate(&state.page);
				Some(state.page.clone())
			}
			Err(e) => {
				tracing::error!(page = %state.page, error = %e, "page bundle failed to load");
				coordinator.show_error(
					PageError::new(e.to_string()).with_heading(BUNDLE_LOAD_ERROR_HEADING),
				);
				None
			}
		}
	}

	/// Spawns a task that runs [`PageLoader::handle_state`] for every
	/// `app-state-update` the coordinator publishes.
	///
	/// The task holds the coordinator weakly. It ends once the last other
	/// handle to the coordinator is dropped, which also drops its bus.
	pub fn spawn(self: Arc<Self>, coordinator: &Arc<AppStateCoordinator>) -> JoinHandle<()> {
		let mut events = coordinator.bus().stream();
		let coordinator = Arc::downgrade(coordinator);
		tokio::spawn(async move {
			loop {
				match events.recv().await {
					Ok(AppEvent::AppStateUpdate(state)) => {
						let Some(coordinator) = coordinator.upgrade() else {
							break;
						};
						self.handle_state(&coordinator, &state).await;
					}
					Ok(_) => {}
					Err(broadcast::error::RecvError::Lagged(skipped)) => {
						tracing::warn!(skipped, "page loader lagged behind state updates");
					}
					Err(broadcast::error::RecvError::Closed) => break,
				}
			}
			tracing::debug!("page loader task stopped");
		})
	}

	fn activate(&self, page: &str) {
		self.active_page.send_if_modified(|current| {
			if current == page {
				return false;
			}
			*current = page.to_string();
			true
		});
	}
}

/// Resolver that only knows a fixed set of bundles and loads them
/// instantly. Useful when every page is compiled in.
#[derive(Debug, Clone, Default)]
pub struct StaticBundles {
	known: Vec<String>,
}

impl StaticBundles {
	/// Knows exactly the bundles of `registry`.
	pub fn from_registry(registry: &BundleRegistry) -> Self {
		Self {
			known: registry.bundles().map(str::to_string).collect(),
		}
	}
}

#[async_trait]
impl BundleResolver for StaticBundles {
	async fn load_bundle(&self, bundle: &str) -> BundleResult<()> {
		if self.known.iter().any(|known| known == bundle) {
			Ok(())
		} else {
			Err(BundleError::UnknownBundle(bundle.to_string()))
		}
	}
}
