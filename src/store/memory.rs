use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{InventoryStore, StockTransaction, StoreError, StoreResult};
use crate::models::{
    IssuedItem, Item, ItemUpdate, LedgerEntry, NewIssuedItem, NewItem, NewLedgerEntry,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    items: BTreeMap<i64, Item>,
    issued_items: Vec<IssuedItem>,
    ledger: Vec<LedgerEntry>,
}

/// In-memory store for tests. A transaction holds the table lock until it
/// commits or drops, the way a SQLite writer does.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_ledger_appends: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later ledger append fail, to exercise rollback.
    pub fn fail_ledger_appends(&self) {
        self.fail_ledger_appends.store(true, Ordering::SeqCst);
    }

    pub async fn issued_items(&self) -> Vec<IssuedItem> {
        self.tables.lock().await.issued_items.clone()
    }

    pub async fn ledger(&self) -> Vec<LedgerEntry> {
        self.tables.lock().await.ledger.clone()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find_item(&self, id: i64) -> StoreResult<Option<Item>> {
        Ok(self.tables.lock().await.items.get(&id).cloned())
    }

    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let tables = self.tables.lock().await;
        Ok(tables.items.values().filter(|i| i.is_active).cloned().collect())
    }

    async fn search_items(&self, term: &str) -> StoreResult<Vec<Item>> {
        let needle = term.to_ascii_lowercase();
        let tables = self.tables.lock().await;
        Ok(tables
            .items
            .values()
            .filter(|i| i.is_active && i.name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert_item(&self, item: &NewItem) -> StoreResult<Item> {
        let mut tables = self.tables.lock().await;
        let id = match item.id {
            Some(id) if tables.items.contains_key(&id) => return Err(StoreError::DuplicateItem(id)),
            Some(id) => id,
            None => tables.items.keys().next_back().map(|last| last + 1).unwrap_or(1),
        };
        let stored = item.clone().into_item(id);
        tables.items.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_item(&self, id: i64, update: &ItemUpdate) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.items.get_mut(&id) {
            Some(item) if item.is_active => {
                item.quantity = update.quantity;
                item.selling_price = update.selling_price;
                item.last_updated = Some(update.updated_on);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn archive_item(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.items.get_mut(&id) {
            Some(item) if item.is_active => {
                item.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_issued_items(&self) -> StoreResult<Vec<IssuedItem>> {
        let tables = self.tables.lock().await;
        let mut issued = tables.issued_items.clone();
        issued.sort_by(|a, b| b.date_issued.cmp(&a.date_issued).then(b.id.cmp(&a.id)));
        Ok(issued)
    }

    async fn ledger_for_item(&self, item_id: i64) -> StoreResult<Vec<LedgerEntry>> {
        let tables = self.tables.lock().await;
        Ok(tables.ledger.iter().filter(|e| e.item_id == item_id).cloned().collect())
    }

    async fn begin(&self) -> StoreResult<Box<dyn StockTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            staged,
            fail_ledger_appends: self.fail_ledger_appends.load(Ordering::SeqCst),
        }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    fail_ledger_appends: bool,
}

#[async_trait]
impl StockTransaction for MemoryTransaction {
    async fn decrement_quantity(&mut self, item_id: i64, by: i64) -> StoreResult<Option<i64>> {
        match self.staged.items.get_mut(&item_id) {
            Some(item) if item.is_active && item.quantity >= by => {
                item.quantity -= by;
                Ok(Some(item.quantity))
            }
            _ => Ok(None),
        }
    }

    async fn append_issued_item(&mut self, record: &NewIssuedItem) -> StoreResult<i64> {
        let id = self.staged.issued_items.len() as i64 + 1;
        self.staged.issued_items.push(IssuedItem {
            id,
            item_id: record.item_id,
            name: record.name.clone(),
            quantity_issued: record.quantity_issued,
            date_issued: record.date_issued,
            department_name: record.department_name.clone(),
        });
        Ok(id)
    }

    async fn append_ledger_entry(&mut self, record: &NewLedgerEntry) -> StoreResult<i64> {
        if self.fail_ledger_appends {
            return Err(StoreError::Unavailable("ledger table is read-only".to_string()));
        }
        let id = self.staged.ledger.len() as i64 + 1;
        self.staged.ledger.push(LedgerEntry {
            id,
            item_id: record.item_id,
            transaction_type: record.transaction_type,
            quantity: record.quantity,
            transaction_date: record.transaction_date,
        });
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction { mut guard, staged, .. } = *self;
        *guard = staged;
        Ok(())
    }
}
