//! Transport 传输层抽象
//!
//! 提供可插拔的跨 tab 事件传输：
//! ```text
//!         ┌────────────────────┐
//!         │ SyncTransport 特征  │  ◄── 可插拔接口
//!         └────────┬───────────┘
//!                  │
//!     ┌────────────┼────────────────┐
//!     ▼            ▼                ▼
//! ChannelTransport EnvelopeTransport NoopTransport
//! (广播通道)        (存储信封)         (能力缺失降级)
//! ```
//!
//! 初始化时按环境能力选择其一（[`select_transport`]）。传输层不可用绝不
//! 产生用户可见错误：publish 内部记录日志后静默返回，本 tab 内的一致性
//! 不受影响。

mod channel;
mod envelope;

pub use channel::{ChannelTransport, SyncChannel};
pub use envelope::EnvelopeTransport;

use async_trait::async_trait;
use shared::sync::SyncEvent;
use uuid::Uuid;

use crate::store::DurableStore;
use std::sync::Arc;

/// Serialized event in flight between tabs.
///
/// `origin` identifies the publishing tab so receivers can drop their own
/// events (local delivery already happened synchronously). The payload is
/// the wire-shape JSON; it is parsed on the receiving side and dropped
/// there if malformed.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub origin: Uuid,
    pub payload: Vec<u8>,
}

/// Inbound subscription errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeError {
    /// Receiver fell behind; `n` envelopes were skipped
    Lagged(u64),
    /// Transport shut down
    Closed,
}

/// One tab's inbound event stream
#[async_trait]
pub trait SyncSubscriber: Send {
    /// Receive the next inbound envelope
    async fn recv(&mut self) -> Result<Envelope, SubscribeError>;
}

/// 跨 tab 传输层特征
///
/// 发布永不失败（内部降级为日志）；订阅端由每个 tab 的 pump 消费。
pub trait SyncTransport: Send + Sync + std::fmt::Debug {
    /// Publish an event to every other tab attached to the same store.
    /// Best-effort: failures are logged, never surfaced.
    fn publish(&self, origin: Uuid, event: &SyncEvent);

    /// Open an inbound subscription for one tab's pump
    fn subscribe(&self) -> Box<dyn SyncSubscriber>;

    /// Transport name for logging
    fn name(&self) -> &'static str;
}

/// Environment capability flags used for transport selection.
///
/// Mirrors the feature checks a browser runtime would make: a dedicated
/// pub/sub channel may be missing, storage-change notices may be missing,
/// or both. Both flags default to available.
#[derive(Debug, Clone, Copy)]
pub struct SyncCapabilities {
    pub broadcast_channel: bool,
    pub storage_notices: bool,
}

impl Default for SyncCapabilities {
    fn default() -> Self {
        Self {
            broadcast_channel: true,
            storage_notices: true,
        }
    }
}

impl SyncCapabilities {
    /// Neither delivery path available: cross-tab convergence is lost,
    /// single-tab operation continues
    pub fn none() -> Self {
        Self {
            broadcast_channel: false,
            storage_notices: false,
        }
    }
}

/// Pick the transport for this environment.
///
/// The dedicated channel is preferred; the storage envelope is the
/// fallback; with neither, cross-tab delivery degrades to a no-op.
pub fn select_transport(
    channel: &SyncChannel,
    store: &DurableStore,
    caps: SyncCapabilities,
) -> Arc<dyn SyncTransport> {
    if caps.broadcast_channel {
        Arc::new(ChannelTransport::new(channel))
    } else if caps.storage_notices {
        tracing::info!("Broadcast channel unavailable, using storage envelope transport");
        Arc::new(EnvelopeTransport::new(store.clone()))
    } else {
        tracing::warn!(
            "No cross-tab transport available; changes will only be visible within this tab"
        );
        Arc::new(NoopTransport)
    }
}

/// Degraded transport used when no delivery path exists in the
/// environment. Publishing is a silent no-op; the subscription never
/// yields.
#[derive(Debug)]
pub struct NoopTransport;

impl SyncTransport for NoopTransport {
    fn publish(&self, _origin: Uuid, event: &SyncEvent) {
        tracing::trace!(collection = %event.collection, action = %event.action,
            "Cross-tab transport unavailable, event not published");
    }

    fn subscribe(&self) -> Box<dyn SyncSubscriber> {
        Box::new(NoopSubscriber)
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

struct NoopSubscriber;

#[async_trait]
impl SyncSubscriber for NoopSubscriber {
    async fn recv(&mut self) -> Result<Envelope, SubscribeError> {
        // Nothing ever arrives; the pump's shutdown token is the only exit
        std::future::pending().await
    }
}
