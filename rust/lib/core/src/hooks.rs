//! HookRegistry: named event-dispatch table owned by the host process.
//!
//! Modules register filters and actions against event names during setup;
//! the host dispatches them explicitly at each call site. There is no
//! ambient global table: the registry is constructed once at startup and
//! passed to whoever needs it.
//!
//! - A **filter** receives a value plus a read-only context and returns the
//!   (possibly modified) value. Filters for one event are chained.
//! - An **action** receives only the context and returns nothing.
//!
//! Callbacks run in ascending priority; equal priorities run in
//! registration order.
//!
//! ```ignore
//! let hooks = HookRegistry::new();
//! hooks.add_filter("content/render", DEFAULT_PRIORITY, |body: String, _ctx: &()| {
//!     format!("<div>{body}</div>")
//! });
//! let out = hooks.apply_filters("content/render", "hi".to_string(), &());
//! assert_eq!(out, "<div>hi</div>");
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

/// Priority used when a caller has no ordering requirement.
pub const DEFAULT_PRIORITY: i32 = 10;

type FilterFn<V, C> = dyn Fn(V, &C) -> V + Send + Sync;
type ActionFn<C> = dyn Fn(&C) + Send + Sync;

/// Type-erased callback. Holds either `Arc<FilterFn<V, C>>` or
/// `Arc<ActionFn<C>>`, recovered by downcasting at dispatch time.
type ErasedCallback = Arc<dyn Any + Send + Sync>;

struct Entry {
    priority: i32,
    seq: u64,
    callback: ErasedCallback,
}

/// Event-dispatch table mapping event names to ordered callbacks.
pub struct HookRegistry {
    events: RwLock<HashMap<String, Vec<Entry>>>,
    next_seq: AtomicU64,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Register a filter for `event`.
    ///
    /// The filter is only invoked by `apply_filters` calls that use the same
    /// value type `V` and context type `C`.
    pub fn add_filter<V, C, F>(&self, event: &str, priority: i32, filter: F)
    where
        V: 'static,
        C: 'static,
        F: Fn(V, &C) -> V + Send + Sync + 'static,
    {
        let callback: Arc<FilterFn<V, C>> = Arc::new(filter);
        self.insert(event, priority, Arc::new(callback));
    }

    /// Register an action for `event`.
    pub fn add_action<C, F>(&self, event: &str, priority: i32, action: F)
    where
        C: 'static,
        F: Fn(&C) + Send + Sync + 'static,
    {
        let callback: Arc<ActionFn<C>> = Arc::new(action);
        self.insert(event, priority, Arc::new(callback));
    }

    /// Run every filter registered for `event` over `value`, in order.
    ///
    /// If nothing is registered the value is returned unchanged.
    pub fn apply_filters<V, C>(&self, event: &str, value: V, ctx: &C) -> V
    where
        V: 'static,
        C: 'static,
    {
        let mut value = value;
        for callback in self.snapshot(event) {
            match callback.downcast_ref::<Arc<FilterFn<V, C>>>() {
                Some(filter) => value = filter(value, ctx),
                None => warn!(event, "skipping callback with mismatched filter signature"),
            }
        }
        value
    }

    /// Run every action registered for `event`, in order.
    pub fn do_action<C>(&self, event: &str, ctx: &C)
    where
        C: 'static,
    {
        for callback in self.snapshot(event) {
            match callback.downcast_ref::<Arc<ActionFn<C>>>() {
                Some(action) => action(ctx),
                None => warn!(event, "skipping callback with mismatched action signature"),
            }
        }
    }

    /// Whether any callback is registered for `event`.
    pub fn has_hooks(&self, event: &str) -> bool {
        self.hook_count(event) > 0
    }

    /// Number of callbacks registered for `event`.
    pub fn hook_count(&self, event: &str) -> usize {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events.get(event).map_or(0, Vec::len)
    }

    fn insert(&self, event: &str, priority: i32, callback: ErasedCallback) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let entries = events.entry(event.to_string()).or_default();
        // Keep entries sorted so dispatch never has to sort.
        let pos = entries.partition_point(|e| (e.priority, e.seq) <= (priority, seq));
        entries.insert(
            pos,
            Entry {
                priority,
                seq,
                callback,
            },
        );
    }

    /// Clone the callback list so no lock is held while callbacks run;
    /// a callback may itself dispatch other events.
    fn snapshot(&self, event: &str) -> Vec<ErasedCallback> {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events
            .get(event)
            .map(|entries| entries.iter().map(|e| Arc::clone(&e.callback)).collect())
            .unwrap_or_default()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
