//! Tab 上下文 - 单个执行上下文的同步端点
//!
//! 一个 [`TabContext`] 对应一个"浏览器 tab"：持有共享存储的句柄、
//! 本 tab 独立的订阅注册表、传输层端点和一个后台 pump 任务。
//! 注册表在每次创建时从空开始，绝不跨 tab 共享。
//!
//! # 事件分发路径
//!
//! ```text
//! broadcast_change ──► registry.dispatch (本 tab, 同步)
//!                 └──► transport.publish (其他 tab)
//!                              │
//!            pump (其他 tab) ──┴──► 该 tab 的 registry.dispatch
//! ```

use shared::error::AppResult;
use shared::models::{Order, Product, Promotion, Review};
use shared::sync::{ChangeAction, Collection, SyncEvent};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::registry::{Subscription, SubscriptionRegistry};
use super::transport::{SubscribeError, SyncTransport};
use crate::store::DurableStore;

/// One tab's view of the shared store
pub struct TabContext {
    id: Uuid,
    store: DurableStore,
    registry: Arc<SubscriptionRegistry>,
    transport: Arc<dyn SyncTransport>,
    shutdown: CancellationToken,
}

impl TabContext {
    /// Attach a new tab to the shared store and start its inbound pump.
    ///
    /// Must be called within a tokio runtime (the pump is a spawned task).
    pub(crate) fn attach(store: DurableStore, transport: Arc<dyn SyncTransport>) -> Self {
        let tab = Self {
            id: Uuid::new_v4(),
            store,
            registry: Arc::new(SubscriptionRegistry::new()),
            transport,
            shutdown: CancellationToken::new(),
        };
        tab.spawn_pump();
        tracing::debug!(tab = %tab.id, transport = tab.transport.name(), "Tab attached");
        tab
    }

    /// 后台 pump：接收入站信封，过滤本 tab 自己发出的事件，
    /// 解析失败的信封丢弃并记录，解析成功的送入本 tab 注册表。
    fn spawn_pump(&self) {
        let mut subscriber = self.transport.subscribe();
        let registry = Arc::clone(&self.registry);
        let token = self.shutdown.clone();
        let tab_id = self.id;

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    inbound = subscriber.recv() => match inbound {
                        Ok(envelope) => {
                            if envelope.origin == tab_id {
                                continue;
                            }
                            match SyncEvent::from_bytes(&envelope.payload) {
                                Ok(event) => registry.dispatch(&event),
                                Err(e) => {
                                    tracing::warn!(tab = %tab_id, error = %e,
                                        "Dropping malformed sync envelope");
                                }
                            }
                        }
                        Err(SubscribeError::Lagged(n)) => {
                            tracing::warn!(tab = %tab_id, skipped = n,
                                "Sync subscriber lagged, events skipped");
                        }
                        Err(SubscribeError::Closed) => break,
                    }
                }
            }
            tracing::debug!(tab = %tab_id, "Sync pump stopped");
        });
    }

    /// Tab identity (the transport origin tag)
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The shared durable store
    pub fn store(&self) -> &DurableStore {
        &self.store
    }

    // ========== THE CORE: broadcast + subscribe ==========

    /// Publish a change notification for `collection`.
    ///
    /// Local listeners are invoked synchronously before this returns;
    /// cross-tab delivery is best-effort and never fails the call.
    /// Call this after every successful collection save.
    pub fn broadcast_change(&self, collection: Collection, action: ChangeAction) {
        let event = SyncEvent::now(collection, action);
        self.registry.dispatch(&event);
        self.transport.publish(self.id, &event);
    }

    /// Register a change listener scoped to this tab.
    ///
    /// The listener sees every event delivered to this tab, its own
    /// broadcasts included. Drop the returned [`Subscription`] (or call
    /// `unsubscribe`) to stop delivery.
    pub fn subscribe(&self, callback: impl Fn(&SyncEvent) + Send + Sync + 'static) -> Subscription {
        self.registry.subscribe(callback)
    }

    /// Number of active listeners in this tab
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Detach the tab: stops the pump. Listeners stop receiving cross-tab
    /// events immediately; the registry dies with the context.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    // ========== Collection access (whole-array reads and overwrites) ==========

    pub fn products(&self) -> AppResult<Vec<Product>> {
        Ok(self.store.read_collection(Collection::Products)?)
    }

    pub fn save_products(&self, items: &[Product]) -> AppResult<()> {
        Ok(self.store.replace_collection(Collection::Products, items, self.id)?)
    }

    pub fn orders(&self) -> AppResult<Vec<Order>> {
        Ok(self.store.read_collection(Collection::Orders)?)
    }

    pub fn save_orders(&self, items: &[Order]) -> AppResult<()> {
        Ok(self.store.replace_collection(Collection::Orders, items, self.id)?)
    }

    pub fn promotions(&self) -> AppResult<Vec<Promotion>> {
        Ok(self.store.read_collection(Collection::Promotions)?)
    }

    pub fn save_promotions(&self, items: &[Promotion]) -> AppResult<()> {
        Ok(self
            .store
            .replace_collection(Collection::Promotions, items, self.id)?)
    }

    pub fn reviews(&self) -> AppResult<Vec<Review>> {
        Ok(self.store.read_collection(Collection::Reviews)?)
    }

    pub fn save_reviews(&self, items: &[Review]) -> AppResult<()> {
        Ok(self.store.replace_collection(Collection::Reviews, items, self.id)?)
    }
}

impl Drop for TabContext {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for TabContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabContext")
            .field("id", &self.id)
            .field("transport", &self.transport.name())
            .field("listeners", &self.registry.len())
            .finish()
    }
}
