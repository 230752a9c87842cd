//! Publish/subscribe channel for [`AppEvent`]s.
//!
//! Listeners are plain synchronous callbacks, invoked in priority order on
//! the publishing thread. Async consumers can take a [`EventBus::stream`]
//! receiver instead.

use crate::event::{AppEvent, EventKind};
use parking_lot::RwLock;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Default capacity of the async event stream.
pub const DEFAULT_STREAM_CAPACITY: usize = 64;

type ListenerFn = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Handle returned by subscription calls, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
struct Listener {
	id: SubscriptionId,
	kinds: Option<Vec<EventKind>>,
	dispatch_uid: Option<String>,
	priority: i32, // Higher values run first
	callback: ListenerFn,
}

impl Listener {
	fn accepts(&self, kind: EventKind) -> bool {
		self.kinds.as_ref().is_none_or(|kinds| kinds.contains(&kind))
	}
}

/// Options for [`EventBus::subscribe_with_options`].
#[derive(Debug, Clone, Default)]
pub struct SubscribeOptions {
	/// Only deliver these kinds. `None` delivers everything.
	pub kinds: Option<Vec<EventKind>>,
	/// Replaces an earlier listener registered with the same uid.
	pub dispatch_uid: Option<String>,
	/// Execution priority, higher first. Equal priorities keep
	/// registration order.
	pub priority: i32,
}

impl SubscribeOptions {
	/// Restricts delivery to `kinds`.
	pub fn kinds(mut self, kinds: impl IntoIterator<Item = EventKind>) -> Self {
		self.kinds = Some(kinds.into_iter().collect());
		self
	}

	/// Sets the dispatch uid.
	pub fn dispatch_uid(mut self, uid: impl Into<String>) -> Self {
		self.dispatch_uid = Some(uid.into());
		self
	}

	/// Sets the priority.
	pub fn priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}
}

/// Broadcasts application events to any number of listeners.
///
/// The bus knows nothing about routing; it only fans events out. Publishing
/// with no listeners is not an error.
pub struct EventBus {
	listeners: RwLock<Vec<Listener>>,
	next_id: AtomicU64,
	stream: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("listeners", &self.listener_count())
			.field("stream_receivers", &self.stream.receiver_count())
			.finish()
	}
}

impl EventBus {
	/// Creates a bus with the default stream capacity.
	pub fn new() -> Self {
		Self::with_stream_capacity(DEFAULT_STREAM_CAPACITY)
	}

	/// Creates a bus whose async stream buffers `capacity` events per
	/// receiver before lagging.
	pub fn with_stream_capacity(capacity: usize) -> Self {
		let (stream, _) = broadcast::channel(capacity.max(1));
		Self {
			listeners: RwLock::new(Vec::new()),
			next_id: AtomicU64::new(1),
			stream,
		}
	}

	/// Subscribes to every event.
	pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
	where
		F: Fn(&AppEvent) + Send + Sync + 'static,
	{
		self.subscribe_with_options(callback, SubscribeOptions::default())
	}

	/// Subscribes to the given kinds only.
	pub fn subscribe_to<F>(
		&self,
		kinds: impl IntoIterator<Item = EventKind>,
		callback: F,
	) -> SubscriptionId
	where
		F: Fn(&AppEvent) + Send + Sync + 'static,
	{
		self.subscribe_with_options(callback, SubscribeOptions::default().kinds(kinds))
	}

	/// Subscribes with full options.
	pub fn subscribe_with_options<F>(&self, callback: F, options: SubscribeOptions) -> SubscriptionId
	where
		F: Fn(&AppEvent) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		let mut listeners = self.listeners.write();

		if let Some(ref uid) = options.dispatch_uid {
			listeners.retain(|l| l.dispatch_uid.as_ref() != Some(uid));
		}

		listeners.push(Listener {
			id,
			kinds: options.kinds,
			dispatch_uid: options.dispatch_uid,
			priority: options.priority,
			callback: Arc::new(callback),
		});

		// Stable sort keeps registration order within a priority
		listeners.sort_by(|a, b| b.priority.cmp(&a.priority));
		id
	}

	/// Removes a listener. Returns whether it was registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut listeners = self.listeners.write();
		let before = listeners.len();
		listeners.retain(|l| l.id != id);
		listeners.len() != before
	}

	/// Removes the listener registered with `dispatch_uid`.
	pub fn disconnect(&self, dispatch_uid: &str) -> bool {
		let mut listeners = self.listeners.write();
		let before = listeners.len();
		listeners.retain(|l| l.dispatch_uid.as_deref() != Some(dispatch_uid));
		listeners.len() != before
	}

	/// Removes every listener.
	pub fn clear(&self) {
		self.listeners.write().clear();
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.read().len()
	}

	/// Publishes an event.
	///
	/// Listeners run in priority order. A panicking listener is logged and
	/// skipped; the remaining listeners still run. Listeners may publish or
	/// subscribe re-entrantly: the listener list is copied before dispatch,
	/// so changes take effect from the next event.
	///
	/// Returns the number of listeners that handled the event.
	pub fn publish(&self, event: AppEvent) -> usize {
		let kind = event.kind();
		let listeners: Vec<Listener> = self
			.listeners
			.read()
			.iter()
			.filter(|l| l.accepts(kind))
			.cloned()
			.collect();

		tracing::trace!(event = %kind, listeners = listeners.len(), "publishing event");

		let mut delivered = 0;
		for listener in &listeners {
			let callback = &listener.callback;
			match catch_unwind(AssertUnwindSafe(|| callback(&event))) {
				Ok(()) => delivered += 1,
				Err(_) => {
					tracing::error!(
						event = %kind,
						subscription = listener.id.0,
						"event listener panicked"
					);
				}
			}
		}

		// No receivers is not an error
		let _ = self.stream.send(event);
		delivered
	}

	/// Returns a receiver of every event published from now on.
	///
	/// Slow receivers observe [`broadcast::error::RecvError::Lagged`] and
	/// skip ahead.
	pub fn stream(&self) -> broadcast::Receiver<AppEvent> {
		self.stream.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::{PageTitle, ToastDismiss};
	use parking_lot::Mutex;
	use rstest::rstest;

	fn title(text: &str) -> AppEvent {
		AppEvent::PageTitleUpdate(PageTitle::shown(text))
	}

	#[rstest]
	fn test_publish_without_listeners() {
		let bus = EventBus::new();
		assert_eq!(bus.publish(AppEvent::NavClose), 0);
	}

	#[rstest]
	fn test_filtered_subscription() {
		// Arrange
		let bus = EventBus::new();
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		bus.subscribe_to([EventKind::NavClose], move |event| {
			sink.lock().push(event.kind());
		});

		// Act
		bus.publish(title("ignored"));
		bus.publish(AppEvent::NavClose);

		// Assert
		assert_eq!(*seen.lock(), vec![EventKind::NavClose]);
	}

	#[rstest]
	fn test_priority_order() {
		let bus = EventBus::new();
		let order = Arc::new(Mutex::new(Vec::new()));

		for (name, priority) in [("low", 0), ("high", 10), ("mid", 5)] {
			let order = order.clone();
			bus.subscribe_with_options(
				move |_| order.lock().push(name),
				SubscribeOptions::default().priority(priority),
			);
		}
		bus.publish(AppEvent::NavClose);

		assert_eq!(*order.lock(), vec!["high", "mid", "low"]);
	}

	#[rstest]
	fn test_dispatch_uid_replaces_listener() {
		let bus = EventBus::new();
		let count = Arc::new(Mutex::new(0));

		for _ in 0..3 {
			let count = count.clone();
			bus.subscribe_with_options(
				move |_| *count.lock() += 1,
				SubscribeOptions::default().dispatch_uid("header"),
			);
		}

		assert_eq!(bus.listener_count(), 1);
		assert_eq!(bus.publish(AppEvent::NavClose), 1);
		assert_eq!(*count.lock(), 1);
		assert!(bus.disconnect("header"));
		assert_eq!(bus.listener_count(), 0);
	}

	#[rstest]
	fn test_unsubscribe() {
		let bus = EventBus::new();
		let id = bus.subscribe(|_| {});

		assert!(bus.unsubscribe(id));
		assert!(!bus.unsubscribe(id));
		assert_eq!(bus.publish(AppEvent::NavClose), 0);
	}

	#[rstest]
	fn test_panicking_listener_does_not_stop_dispatch() {
		// Arrange
		let bus = EventBus::new();
		let reached = Arc::new(Mutex::new(false));
		bus.subscribe_with_options(
			|_| panic!("listener failure"),
			SubscribeOptions::default().priority(1),
		);
		let flag = reached.clone();
		bus.subscribe(move |_| *flag.lock() = true);

		// Act
		let delivered = bus.publish(AppEvent::ToastDismiss(ToastDismiss {
			message: "Toast Dismissed".to_string(),
		}));

		// Assert
		assert_eq!(delivered, 1);
		assert!(*reached.lock());
	}

	#[rstest]
	fn test_reentrant_publish() {
		let bus = Arc::new(EventBus::new());
		let seen = Arc::new(Mutex::new(Vec::new()));

		let inner = Arc::downgrade(&bus);
		bus.subscribe_to([EventKind::PageTitleUpdate], move |_| {
			if let Some(bus) = inner.upgrade() {
				bus.publish(AppEvent::NavClose);
			}
		});
		let sink = seen.clone();
		bus.subscribe(move |event| sink.lock().push(event.kind()));

		bus.publish(title("Home"));

		assert_eq!(
			*seen.lock(),
			vec![EventKind::NavClose, EventKind::PageTitleUpdate]
		);
	}

	#[tokio::test]
	async fn test_stream_receives_events() {
		let bus = EventBus::new();
		let mut rx = bus.stream();

		bus.publish(title("Reports"));

		let event = rx.recv().await.unwrap();
		assert_eq!(event, title("Reports"));
	}
}
