//! 广播通道传输 - 专用 pub/sub 原语
//!
//! 对应浏览器的 `BroadcastChannel("laroza-data-sync")`：一个以存储源为
//! 作用域的进程内广播通道。发布者自己也会收到信封，由 pump 按 origin
//! 过滤掉。

use async_trait::async_trait;
use shared::sync::SyncEvent;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{Envelope, SubscribeError, SyncSubscriber, SyncTransport};

/// Channel name, kept for parity with the storage origin it is scoped to
pub const CHANNEL_NAME: &str = "laroza-data-sync";

/// The shared pub/sub primitive, one per store origin.
///
/// Owned by the application root; every tab's [`ChannelTransport`] is a
/// cheap handle onto it.
#[derive(Debug, Clone)]
pub struct SyncChannel {
    sender: broadcast::Sender<Envelope>,
}

impl SyncChannel {
    /// Create the channel with the given buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub(crate) fn sender(&self) -> &broadcast::Sender<Envelope> {
        &self.sender
    }
}

/// Transport backed by the shared broadcast channel
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: broadcast::Sender<Envelope>,
}

impl ChannelTransport {
    pub fn new(channel: &SyncChannel) -> Self {
        Self {
            sender: channel.sender().clone(),
        }
    }
}

impl SyncTransport for ChannelTransport {
    fn publish(&self, origin: Uuid, event: &SyncEvent) {
        let payload = match event.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize sync event, not published");
                return;
            }
        };
        // Err means no tab is currently subscribed; nothing to deliver to
        if self.sender.send(Envelope { origin, payload }).is_err() {
            tracing::trace!(channel = CHANNEL_NAME, "No subscribers on sync channel");
        }
    }

    fn subscribe(&self) -> Box<dyn SyncSubscriber> {
        Box::new(ChannelSubscriber {
            receiver: self.sender.subscribe(),
        })
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}

struct ChannelSubscriber {
    receiver: broadcast::Receiver<Envelope>,
}

#[async_trait]
impl SyncSubscriber for ChannelSubscriber {
    async fn recv(&mut self) -> Result<Envelope, SubscribeError> {
        match self.receiver.recv().await {
            Ok(envelope) => Ok(envelope),
            Err(broadcast::error::RecvError::Lagged(n)) => Err(SubscribeError::Lagged(n)),
            Err(broadcast::error::RecvError::Closed) => Err(SubscribeError::Closed),
        }
    }
}
