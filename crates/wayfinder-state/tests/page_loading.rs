//! Lazy page loading driven by application state.

use async_trait::async_trait;
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use wayfinder_state::{
	AppConfig, AppEvent, AppShell, BUNDLE_LOAD_ERROR_HEADING, BundleError, BundleRegistry,
	BundleResolver, BundleResult, EventKind, LoadOutcome, PageLifecycle, PageLoader,
};

/// Resolver that blocks every load until released.
struct GatedResolver {
	calls: AtomicUsize,
	gate: Notify,
	failing: Mutex<Vec<String>>,
}

impl GatedResolver {
	fn new() -> Arc<Self> {
		Arc::new(Self {
			calls: AtomicUsize::new(0),
			gate: Notify::new(),
			failing: Mutex::new(Vec::new()),
		})
	}

	fn open() -> Arc<Self> {
		let resolver = Self::new();
		resolver.gate.notify_one();
		resolver
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl BundleResolver for GatedResolver {
	async fn load_bundle(&self, bundle: &str) -> BundleResult<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.gate.notified().await;
		// Let the next load through as well
		self.gate.notify_one();
		if self.failing.lock().iter().any(|b| b == bundle) {
			return Err(BundleError::load_failed(bundle, "network unreachable"));
		}
		Ok(())
	}
}

#[fixture]
fn config() -> AppConfig {
	AppConfig::from_toml_str(
		r#"
title = "Inventory"

[[routes]]
route_id = "home"
page_id = "page-home"
is_home = true
breadcrumb_text = "Home"

[[routes]]
route_id = "items"
page_id = "page-items"
path_segment = "items"

[[routes]]
route_id = "item"
page_id = "page-item"
path_segment = "*"
parent = "items"

[[routes]]
route_id = "admin"
page_id = "page-admin"
path_segment = "admin"

[bundles]
core = ["page-home"]
items = ["page-items", "page-item"]
admin = ["page-admin"]
"#,
	)
	.unwrap()
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_load() {
	// Arrange
	let resolver = GatedResolver::new();
	let registry = BundleRegistry::new().with_bundle("items", ["page-items", "page-item"]);
	let loader = Arc::new(PageLoader::new(registry, resolver.clone()));

	// Act
	let mut handles = Vec::new();
	for page in ["page-items", "page-item", "page-items", "page-item"] {
		let loader = loader.clone();
		handles.push(tokio::spawn(async move { loader.ensure_loaded(page).await }));
	}
	tokio::time::sleep(Duration::from_millis(20)).await;
	resolver.gate.notify_one();

	let mut outcomes = Vec::new();
	for handle in handles {
		outcomes.push(handle.await.unwrap().unwrap());
	}

	// Assert
	assert_eq!(resolver.calls(), 1);
	let fresh = outcomes
		.iter()
		.filter(|o| matches!(o, LoadOutcome::Loaded { .. }))
		.count();
	assert_eq!(fresh, 1);
	assert!(loader.is_loaded("items"));
}

#[rstest]
#[tokio::test]
async fn test_first_load_refreshes_state(config: AppConfig) {
	// Arrange
	let shell = AppShell::new(config, GatedResolver::open(), None).unwrap();
	let events = Arc::new(Mutex::new(Vec::new()));
	let sink = events.clone();
	shell
		.bus()
		.subscribe_to([EventKind::AppStateUpdate], move |event| {
			sink.lock().push(event.clone());
		});

	// Act
	let first = shell.navigate("/items/42").await;
	let second = shell.navigate("/items").await;

	// Assert
	assert_eq!(first.as_deref(), Some("page-item"));
	assert_eq!(second.as_deref(), Some("page-items"));
	// navigation, refresh after first load, second navigation
	assert_eq!(events.lock().len(), 3);
	assert_eq!(*shell.loader().active_page().borrow(), "page-items");
}

#[rstest]
#[tokio::test]
async fn test_bundle_failure_shows_error(config: AppConfig) {
	// Arrange
	let resolver = GatedResolver::open();
	resolver.failing.lock().push("admin".to_string());
	let shell = AppShell::new(config, resolver.clone(), None).unwrap();

	// Act
	let page = shell.navigate("/admin").await;

	// Assert
	assert_eq!(page, None);
	let state = shell.coordinator().snapshot();
	assert_eq!(state.page, "page-admin");
	assert_eq!(state.page_lifecycle, PageLifecycle::Error);
	let error = state.error.as_ref().unwrap();
	assert_eq!(error.error_heading.as_deref(), Some(BUNDLE_LOAD_ERROR_HEADING));

	// A later navigation retries the failed bundle
	resolver.failing.lock().clear();
	assert_eq!(shell.navigate("/admin").await.as_deref(), Some("page-admin"));
	assert_eq!(resolver.calls(), 2);
}

#[rstest]
#[tokio::test]
async fn test_started_shell_loads_in_background(config: AppConfig) {
	// Arrange
	let resolver = GatedResolver::open();
	let shell = AppShell::new(config, resolver.clone(), None).unwrap();
	let handle = shell.start();
	let mut active = shell.loader().active_page();

	// Act
	shell.coordinator().navigate("/items");

	// Assert
	tokio::time::timeout(Duration::from_secs(1), active.changed())
		.await
		.expect("page loader did not react")
		.unwrap();
	assert_eq!(*active.borrow(), "page-items");
	assert!(shell.loader().is_loaded("items"));
	handle.abort();
}

#[rstest]
#[tokio::test]
async fn test_background_loader_stops_with_shell(config: AppConfig) {
	// Arrange
	let shell = AppShell::new(config, GatedResolver::open(), None).unwrap();
	let handle = shell.start();
	shell.coordinator().navigate("/items");

	// Act
	drop(shell);

	// Assert
	tokio::time::timeout(Duration::from_millis(500), handle)
		.await
		.expect("page loader outlived its shell")
		.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_unknown_page_is_noop() {
	let resolver = GatedResolver::open();
	let loader = PageLoader::new(BundleRegistry::new(), resolver.clone());

	let outcome = loader.ensure_loaded("page-unknown").await.unwrap();

	assert_eq!(outcome, LoadOutcome::UnknownPage);
	assert_eq!(resolver.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn test_stream_sees_navigation_events(config: AppConfig) {
	let shell = AppShell::new(config, GatedResolver::open(), None).unwrap();
	let mut stream = shell.bus().stream();

	shell.coordinator().navigate("/items");

	let first = stream.recv().await.unwrap();
	assert!(matches!(first, AppEvent::RouteIdUpdate(ref u) if u.route_id == "items"));
}
