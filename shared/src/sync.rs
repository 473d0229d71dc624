//! 同步事件类型定义
//!
//! 这些类型在所有 tab 之间共享，用于进程内分发和跨 tab 传输。
//! 事件是一次性的通知，从不落盘、从不重放给晚到的订阅者。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection type tag carried on every sync event.
///
/// Four of the five tags correspond to persisted collections.
/// `Inventory` is an event-only channel with no storage key: stock
/// mutations co-broadcast it alongside `Products` by convention, and the
/// broadcaster never merges or deduplicates the two. Subscribers that care
/// about stock must register interest in both tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Products,
    Orders,
    Promotions,
    Reviews,
    Inventory,
}

impl Collection {
    /// Durable store key backing this collection (`None` for the
    /// event-only `Inventory` tag)
    pub fn storage_key(&self) -> Option<&'static str> {
        match self {
            Collection::Products => Some("products"),
            Collection::Orders => Some("orders"),
            Collection::Promotions => Some("promotions"),
            Collection::Reviews => Some("reviews"),
            Collection::Inventory => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Products => write!(f, "products"),
            Collection::Orders => write!(f, "orders"),
            Collection::Promotions => write!(f, "promotions"),
            Collection::Reviews => write!(f, "reviews"),
            Collection::Inventory => write!(f, "inventory"),
        }
    }
}

/// Kind of mutation that produced a sync event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeAction::Create => write!(f, "create"),
            ChangeAction::Update => write!(f, "update"),
            ChangeAction::Delete => write!(f, "delete"),
        }
    }
}

/// Change notification fanned out to every interested listener.
///
/// Wire shape (both transports carry it verbatim):
///
/// ```json
/// { "type": "orders", "action": "create", "timestamp": 1769040000000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    #[serde(rename = "type")]
    pub collection: Collection,
    pub action: ChangeAction,
    /// Unix millis at broadcast time
    pub timestamp: i64,
}

impl SyncEvent {
    /// Create an event stamped with the current time
    pub fn now(collection: Collection, action: ChangeAction) -> Self {
        Self {
            collection,
            action,
            timestamp: crate::util::now_millis(),
        }
    }

    /// 序列化为传输载荷
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// 从传输载荷解析
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
