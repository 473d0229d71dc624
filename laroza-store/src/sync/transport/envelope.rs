//! 存储信封传输 - storage 通知回退路径
//!
//! 把序列化的事件写入约定键 `laroza-sync-event`，其他 tab 通过存储
//! 变更通知观察到它。信封值是一次性的，不是有意义的持久化数据：
//! 它随下一次发布被整体覆盖，从不被读回作为状态。

use async_trait::async_trait;
use shared::sync::SyncEvent;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{Envelope, SubscribeError, SyncSubscriber, SyncTransport};
use crate::store::{DurableStore, SYNC_ENVELOPE_KEY, StorageNotice};

/// Transport backed by a well-known store key plus change notices
#[derive(Debug, Clone)]
pub struct EnvelopeTransport {
    store: DurableStore,
}

impl EnvelopeTransport {
    pub fn new(store: DurableStore) -> Self {
        Self { store }
    }
}

impl SyncTransport for EnvelopeTransport {
    fn publish(&self, origin: Uuid, event: &SyncEvent) {
        let payload = match event.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize sync event, not published");
                return;
            }
        };
        if let Err(e) = self.store.put_raw(SYNC_ENVELOPE_KEY, &payload, origin) {
            // Cross-tab delivery degrades silently; same-tab consistency
            // was already handled by the local dispatch
            tracing::warn!(error = %e, "Failed to write sync envelope, event not published");
        }
    }

    fn subscribe(&self) -> Box<dyn SyncSubscriber> {
        Box::new(EnvelopeSubscriber {
            notices: self.store.notices(),
        })
    }

    fn name(&self) -> &'static str {
        "envelope"
    }
}

struct EnvelopeSubscriber {
    notices: broadcast::Receiver<StorageNotice>,
}

#[async_trait]
impl SyncSubscriber for EnvelopeSubscriber {
    async fn recv(&mut self) -> Result<Envelope, SubscribeError> {
        loop {
            match self.notices.recv().await {
                // Only the envelope key carries sync events; data-key
                // notices pass by
                Ok(notice) if notice.key == SYNC_ENVELOPE_KEY => {
                    return Ok(Envelope {
                        origin: notice.origin,
                        payload: notice.value,
                    });
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    return Err(SubscribeError::Lagged(n));
                }
                Err(broadcast::error::RecvError::Closed) => return Err(SubscribeError::Closed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::sync::{ChangeAction, Collection};

    #[tokio::test]
    async fn envelope_roundtrips_through_store() {
        let store = DurableStore::open_in_memory().unwrap();
        let transport = EnvelopeTransport::new(store.clone());
        let mut sub = transport.subscribe();

        let origin = Uuid::new_v4();
        let event = SyncEvent::now(Collection::Promotions, ChangeAction::Update);
        transport.publish(origin, &event);

        let envelope = sub.recv().await.unwrap();
        assert_eq!(envelope.origin, origin);
        assert_eq!(SyncEvent::from_bytes(&envelope.payload).unwrap(), event);
    }

    #[tokio::test]
    async fn data_writes_do_not_surface_as_envelopes() {
        let store = DurableStore::open_in_memory().unwrap();
        let transport = EnvelopeTransport::new(store.clone());
        let mut sub = transport.subscribe();

        let origin = Uuid::new_v4();
        store.put_raw("products", b"[]", origin).unwrap();
        transport.publish(origin, &SyncEvent::now(Collection::Products, ChangeAction::Update));

        // First envelope received must be the sync event, not the data write
        let envelope = sub.recv().await.unwrap();
        let event = SyncEvent::from_bytes(&envelope.payload).unwrap();
        assert_eq!(event.collection, Collection::Products);
    }
}
