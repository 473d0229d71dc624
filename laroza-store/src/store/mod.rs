//! redb-based durable store
//!
//! One key-value table holds the whole persisted state. Each collection is a
//! single JSON array value, replaced in its entirety on every save. The
//! store deliberately has no partial update, no merge, and no versioning.
//! Between tabs this makes every save last-writer-wins.
//!
//! # Keys
//!
//! | Key | Value | Purpose |
//! |-----|-------|---------|
//! | `products` | `Vec<Product>` JSON | Catalog |
//! | `orders` | `Vec<Order>` JSON | Orders |
//! | `promotions` | `Vec<Promotion>` JSON | Promo codes |
//! | `reviews` | `Vec<Review>` JSON | Reviews |
//! | `currentUser` | `CurrentUser` JSON | Session identity |
//! | `customerAccounts` | `Vec<CustomerAccount>` JSON | Registered accounts |
//! | `laroza-sync-event` | `SyncEvent` JSON | Disposable transport envelope |
//!
//! # Change notices
//!
//! Every raw put emits a [`StorageNotice`] on a broadcast stream, tagged
//! with the writing tab's origin id. This is the storage-change notification
//! other tabs observe; the envelope transport is built on it.

pub mod seed;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::AppError;
use shared::sync::Collection;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Single table mapping collection key -> JSON bytes
const COLLECTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

/// Well-known key the envelope transport writes sync events to.
/// Its value is a disposable envelope, never meaningful persisted state.
pub const SYNC_ENVELOPE_KEY: &str = "laroza-sync-event";

/// Session identity key (not a synchronized collection)
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Registered customer accounts key (not a synchronized collection)
pub const CUSTOMER_ACCOUNTS_KEY: &str = "customerAccounts";

/// Capacity of the storage-notice broadcast stream
const NOTICE_CAPACITY: usize = 1024;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Collection {0} is an event-only tag with no storage key")]
    EventOnly(Collection),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Serialization(err) => err.into(),
            other => AppError::storage(other.to_string()),
        }
    }
}

/// Notification emitted on every raw store write.
///
/// `origin` identifies the tab that performed the write so receivers can
/// skip their own writes.
#[derive(Debug, Clone)]
pub struct StorageNotice {
    pub origin: Uuid,
    pub key: String,
    pub value: Vec<u8>,
}

/// Durable key-value store shared by every tab on the same origin
#[derive(Clone)]
pub struct DurableStore {
    db: Arc<Database>,
    notices: broadcast::Sender<StorageNotice>,
}

impl DurableStore {
    /// Open or create the store file at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::from_database(db)
    }

    /// Open an in-memory store (tests, demos)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::from_database(db)
    }

    fn from_database(db: Database) -> StoreResult<Self> {
        // Create the table up front so reads never race table creation
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(COLLECTIONS_TABLE)?;
        }
        write_txn.commit()?;

        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Ok(Self {
            db: Arc::new(db),
            notices,
        })
    }

    /// Subscribe to storage-change notices (fires for every raw put)
    pub fn notices(&self) -> broadcast::Receiver<StorageNotice> {
        self.notices.subscribe()
    }

    // ========== Raw key-value operations ==========

    /// Read the raw JSON bytes stored under `key`
    pub fn get_raw(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLECTIONS_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    /// Replace the value under `key` in its entirety.
    ///
    /// The write commits before the notice is emitted, so a tab re-reading
    /// on notice arrival always observes the new value.
    pub fn put_raw(&self, key: &str, value: &[u8], origin: Uuid) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COLLECTIONS_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;

        // No receivers is fine; the notice is best-effort
        let _ = self.notices.send(StorageNotice {
            origin,
            key: key.to_string(),
            value: value.to_vec(),
        });
        Ok(())
    }

    /// Remove the value under `key`
    pub fn remove_raw(&self, key: &str, origin: Uuid) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COLLECTIONS_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;

        let _ = self.notices.send(StorageNotice {
            origin,
            key: key.to_string(),
            value: Vec::new(),
        });
        Ok(())
    }

    /// Whether a value exists under `key`
    pub fn contains_key(&self, key: &str) -> StoreResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLECTIONS_TABLE)?;
        Ok(table.get(key)?.is_some())
    }

    // ========== Whole-collection operations ==========

    /// Read an entire collection. Absent key reads as empty.
    pub fn read_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> StoreResult<Vec<T>> {
        let key = collection
            .storage_key()
            .ok_or(StoreError::EventOnly(collection))?;
        match self.get_raw(key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace an entire collection. This is the only write primitive:
    /// concurrent saves from other tabs are silently overwritten
    /// (last-writer-wins).
    pub fn replace_collection<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
        origin: Uuid,
    ) -> StoreResult<()> {
        let key = collection
            .storage_key()
            .ok_or(StoreError::EventOnly(collection))?;
        let bytes = serde_json::to_vec(items)?;
        self.put_raw(key, &bytes, origin)
    }

    // ========== Typed single-value operations ==========

    /// Read a single JSON value (session identity, account list)
    pub fn read_value<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Write a single JSON value
    pub fn write_value<T: Serialize>(&self, key: &str, value: &T, origin: Uuid) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.put_raw(key, &bytes, origin)
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore").finish_non_exhaustive()
    }
}
