//! Document store access for time entries.
//!
//! Handlers only see [`EntryStore`]; the process picks a backend once at
//! start-up and shares it through [`crate::AppState`]. [`SqliteStore`]
//! persists to a database file, [`MemoryStore`] lives and dies with the
//! process.

mod memory;
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::dates::DateRange;
use crate::model::{Entry, EntryId, EntryPatch, NewEntry};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Typed accessor over the time entry collection.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Every entry, in the backend's native order.
    async fn find_all(&self) -> StoreResult<Vec<Entry>>;

    /// Entries whose `date` lies within `range`, both bounds inclusive.
    async fn find_in_range(&self, range: &DateRange) -> StoreResult<Vec<Entry>>;

    /// Stores a new entry under a freshly generated id.
    async fn insert(&self, input: NewEntry) -> StoreResult<Entry>;

    /// Returns the post-update entry, or `None` when nothing has this id.
    async fn update_by_id(&self, id: &EntryId, patch: EntryPatch) -> StoreResult<Option<Entry>>;

    /// Returns the removed entry, or `None` when nothing has this id.
    async fn delete_by_id(&self, id: &EntryId) -> StoreResult<Option<Entry>>;
}
