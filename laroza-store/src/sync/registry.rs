//! 订阅注册表 - 单个 tab 内的监听器集合
//!
//! 每个 tab 持有自己的注册表，fresh load 时从空开始重建，
//! 绝不跨 tab 共享。跨 tab 事件经传输层进入本 tab 的 pump，
//! 再通过同一个 [`SubscriptionRegistry::dispatch`] 分发。

use shared::sync::SyncEvent;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

type ListenerFn = dyn Fn(&SyncEvent) + Send + Sync;

/// Mutable set of change listeners scoped to one tab
pub struct SubscriptionRegistry {
    listeners: Arc<DashMap<u64, Arc<ListenerFn>>>,
    next_id: AtomicU64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener. The returned [`Subscription`] is the disposer;
    /// dropping it (or calling `unsubscribe`) removes the listener.
    pub fn subscribe(&self, callback: impl Fn(&SyncEvent) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, Arc::new(callback));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Deliver one event to every active listener, synchronously.
    ///
    /// The listener set is snapshotted first, then membership is re-checked
    /// immediately before each invocation: a listener removed mid-dispatch
    /// (including by its own callback) is not invoked for the in-flight
    /// event. Listeners added mid-dispatch only see later events.
    ///
    /// A panicking listener is isolated: logged, and delivery continues
    /// to the remaining listeners.
    pub fn dispatch(&self, event: &SyncEvent) {
        let snapshot: Vec<(u64, Arc<ListenerFn>)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        for (id, listener) in snapshot {
            if !self.listeners.contains_key(&id) {
                continue;
            }
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(event))) {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(listener = id, %reason, "Sync listener panicked, skipping it");
            }
        }
    }

    /// Number of active listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Disposer for one registered listener.
///
/// `unsubscribe` is idempotent; dropping the subscription unsubscribes too.
/// Holds only a weak handle, so an outlived registry is a no-op, not an
/// error.
pub struct Subscription {
    id: u64,
    listeners: Weak<DashMap<u64, Arc<ListenerFn>>>,
}

impl Subscription {
    /// Remove the listener. Calling this twice is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(&self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::sync::{ChangeAction, Collection};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn event(collection: Collection, action: ChangeAction) -> SyncEvent {
        SyncEvent::now(collection, action)
    }

    #[test]
    fn each_listener_fires_once_per_dispatch() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let _sub = registry.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&event(Collection::Orders, ChangeAction::Create));
        registry.dispatch(&event(Collection::Orders, ChangeAction::Update));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn listener_receives_event_fields() {
        let registry = SubscriptionRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        let _sub = registry.subscribe(move |event| {
            s.lock().unwrap().push((event.collection, event.action));
        });

        registry.dispatch(&event(Collection::Orders, ChangeAction::Create));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(Collection::Orders, ChangeAction::Create)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let sub = registry.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&event(Collection::Products, ChangeAction::Update));
        sub.unsubscribe();
        sub.unsubscribe(); // idempotent
        registry.dispatch(&event(Collection::Products, ChangeAction::Update));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn drop_unsubscribes() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let sub = registry.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(sub);

        registry.dispatch(&event(Collection::Reviews, ChangeAction::Delete));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reentrant_unsubscribe_during_dispatch() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        // The first listener (by registration) removes the second mid-dispatch.
        // Whichever order the snapshot runs in, the removed listener must not
        // fire after its removal, and must never fire again.
        let victim_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&victim_slot);
        let _killer = registry.subscribe(move |_| {
            if let Some(victim) = slot.lock().unwrap().take() {
                victim.unsubscribe();
            }
        });

        let c = Arc::clone(&count);
        let victim = registry.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        *victim_slot.lock().unwrap() = Some(victim);

        registry.dispatch(&event(Collection::Orders, ChangeAction::Create));
        let after_first = count.load(Ordering::SeqCst);

        // Future events definitely skip the victim
        registry.dispatch(&event(Collection::Orders, ChangeAction::Create));
        assert_eq!(count.load(Ordering::SeqCst), after_first);
        assert!(after_first <= 1);
    }

    #[test]
    fn self_unsubscribe_fires_at_most_once() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let c = Arc::clone(&count);
        let s = Arc::clone(&slot);
        let sub = registry.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(me) = s.lock().unwrap().take() {
                me.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        registry.dispatch(&event(Collection::Inventory, ChangeAction::Update));
        registry.dispatch(&event(Collection::Inventory, ChangeAction::Update));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let registry = SubscriptionRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let _bad = registry.subscribe(|_| panic!("listener exploded"));
        let c = Arc::clone(&count);
        let _good = registry.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&event(Collection::Promotions, ChangeAction::Update));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disposer_outliving_registry_is_noop() {
        let registry = SubscriptionRegistry::new();
        let sub = registry.subscribe(|_| {});
        drop(registry);
        sub.unsubscribe();
    }
}
