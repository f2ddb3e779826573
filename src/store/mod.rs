//! Storage collaborator for the catalog and the two ledgers.
//!
//! Handlers and services only see [`InventoryStore`]; the SQLite
//! implementation backs the running server and [`memory::MemoryStore`]
//! stands in for it in tests.

pub mod sqlite;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    IssuedItem, Item, ItemUpdate, LedgerEntry, NewIssuedItem, NewItem, NewLedgerEntry,
};

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("item {0} already exists")]
    DuplicateItem(i64),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Looks up an item by id, archived items included.
    async fn find_item(&self, id: i64) -> StoreResult<Option<Item>>;

    /// Active items ordered by id.
    async fn list_items(&self) -> StoreResult<Vec<Item>>;

    /// Active items whose name contains `term`, ignoring ASCII case.
    async fn search_items(&self, term: &str) -> StoreResult<Vec<Item>>;

    async fn insert_item(&self, item: &NewItem) -> StoreResult<Item>;

    /// Returns `false` when no active item has this id.
    async fn update_item(&self, id: i64, update: &ItemUpdate) -> StoreResult<bool>;

    /// Soft delete. Returns `false` when no active item has this id.
    async fn archive_item(&self, id: i64) -> StoreResult<bool>;

    /// All issuance records, newest first.
    async fn list_issued_items(&self) -> StoreResult<Vec<IssuedItem>>;

    /// Ledger entries for one item in the order they were written.
    async fn ledger_for_item(&self, item_id: i64) -> StoreResult<Vec<LedgerEntry>>;

    async fn begin(&self) -> StoreResult<Box<dyn StockTransaction>>;
}

/// A unit of work over the item store and both ledgers.
///
/// Nothing written through it is visible until [`commit`](Self::commit);
/// dropping it uncommitted rolls every write back.
#[async_trait]
pub trait StockTransaction: Send {
    /// Decrements stock only if the active item still holds at least `by`
    /// units. Returns the quantity left after the write, or `None` when the
    /// guard rejected it.
    async fn decrement_quantity(&mut self, item_id: i64, by: i64) -> StoreResult<Option<i64>>;

    async fn append_issued_item(&mut self, record: &NewIssuedItem) -> StoreResult<i64>;

    async fn append_ledger_entry(&mut self, record: &NewLedgerEntry) -> StoreResult<i64>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Escapes LIKE wildcards so a search term matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
