//! 跨 tab 数据同步核心
//!
//! # 架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      TabContext                          │
//! │  broadcast_change(collection, action)                    │
//! │        │                                                 │
//! │        ├──► SubscriptionRegistry (本 tab, 同步分发)       │
//! │        └──► SyncTransport (其他 tab, best-effort)        │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//!               ┌──────────┴──────────┐
//!               │  SyncTransport 特征  │  ◄── 初始化时按环境能力选择
//!               └──────────┬──────────┘
//!                          │
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//!   ChannelTransport  EnvelopeTransport  NoopTransport
//!   (进程内广播通道)   (存储信封 + 通知)   (单 tab 降级)
//! ```
//!
//! # 事件流
//!
//! 每个 tab 运行一个后台 pump 任务，接收入站信封，过滤自己发出的事件，
//! 解析后送入本 tab 的 SubscriptionRegistry，与本地事件走同一条分发路径。
//! 解析失败的信封被丢弃并记录日志，绝不传给订阅者。

pub mod refresh;
pub mod registry;
pub mod tab;
pub mod transport;

pub use refresh::AutoRefresh;
pub use registry::{Subscription, SubscriptionRegistry};
pub use tab::TabContext;
pub use transport::{
    ChannelTransport, Envelope, EnvelopeTransport, NoopTransport, SubscribeError,
    SyncCapabilities, SyncChannel, SyncSubscriber, SyncTransport, select_transport,
};
