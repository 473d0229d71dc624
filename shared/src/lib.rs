//! Shared types for the Laroza storefront engine
//!
//! Common types used across crates: data models, error types,
//! sync event types, and time/id utilities.

pub mod error;
pub mod models;
pub mod sync;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Sync event re-exports (for convenient access)
pub use sync::{ChangeAction, Collection, SyncEvent};
