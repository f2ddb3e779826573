use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};

use super::{like_pattern, InventoryStore, StockTransaction, StoreError, StoreResult};
use crate::{
    database::Database,
    models::{IssuedItem, Item, ItemUpdate, LedgerEntry, NewIssuedItem, NewItem, NewLedgerEntry},
};

// "current_date" is quoted: bare, SQLite reads it as the CURRENT_DATE keyword.
const ITEM_COLUMNS: &str = r#"id, name, quantity, unit, cost_per_unit, total_cost, selling_price,
    supplier, date_added, last_updated, location, min_stock_level, max_stock_level,
    reorder_quantity, notes, "current_date", is_active"#;

#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn find_item(&self, id: i64) -> StoreResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(item)
    }

    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE is_active = 1 ORDER BY id",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn search_items(&self, term: &str) -> StoreResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            r"SELECT {} FROM items WHERE is_active = 1 AND name LIKE ? ESCAPE '\' ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn insert_item(&self, item: &NewItem) -> StoreResult<Item> {
        // A NULL id lets SQLite assign the next rowid.
        let inserted = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (
                id, name, quantity, unit, cost_per_unit, total_cost, selling_price, supplier,
                date_added, location, min_stock_level, max_stock_level, reorder_quantity, notes,
                "current_date"
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.cost_per_unit)
        .bind(item.total_cost())
        .bind(item.selling_price)
        .bind(&item.supplier)
        .bind(item.date_added)
        .bind(&item.location)
        .bind(item.min_stock_level)
        .bind(item.max_stock_level)
        .bind(item.reorder_quantity)
        .bind(&item.notes)
        .bind(item.current_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint failed") =>
            {
                StoreError::DuplicateItem(item.id.unwrap_or_default())
            }
            other => StoreError::Database(other),
        })?;

        Ok(inserted)
    }

    async fn update_item(&self, id: i64, update: &ItemUpdate) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE items SET quantity = ?, selling_price = ?, last_updated = ? WHERE id = ? AND is_active = 1"
        )
        .bind(update.quantity)
        .bind(update.selling_price)
        .bind(update.updated_on)
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn archive_item(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE items SET is_active = 0 WHERE id = ? AND is_active = 1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_issued_items(&self) -> StoreResult<Vec<IssuedItem>> {
        let issued = sqlx::query_as::<_, IssuedItem>(
            r#"
            SELECT id, item_id, name, quantity_issued, date_issued, department_name
            FROM issued_items
            ORDER BY date_issued DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(issued)
    }

    async fn ledger_for_item(&self, item_id: i64) -> StoreResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, item_id, transaction_type, quantity, transaction_date
            FROM ledger
            WHERE item_id = ?
            ORDER BY id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    // The first statement of every stock transaction is the decrement, so
    // SQLite takes the write lock up front and competing writers wait out the
    // busy timeout instead of failing with `database is locked`.
    async fn begin(&self) -> StoreResult<Box<dyn StockTransaction>> {
        let tx = self.db.begin().await?;
        Ok(Box::new(SqliteStockTransaction { tx }))
    }
}

pub struct SqliteStockTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl StockTransaction for SqliteStockTransaction {
    async fn decrement_quantity(&mut self, item_id: i64, by: i64) -> StoreResult<Option<i64>> {
        let remaining = sqlx::query_scalar::<_, i64>(
            "UPDATE items SET quantity = quantity - ? WHERE id = ? AND is_active = 1 AND quantity >= ? \
             RETURNING quantity"
        )
        .bind(by)
        .bind(item_id)
        .bind(by)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(remaining)
    }

    async fn append_issued_item(&mut self, record: &NewIssuedItem) -> StoreResult<i64> {
        let result = sqlx::query(
            "INSERT INTO issued_items (item_id, name, quantity_issued, date_issued, department_name) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(record.item_id)
        .bind(&record.name)
        .bind(record.quantity_issued)
        .bind(record.date_issued)
        .bind(&record.department_name)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn append_ledger_entry(&mut self, record: &NewLedgerEntry) -> StoreResult<i64> {
        let result = sqlx::query(
            "INSERT INTO ledger (item_id, transaction_type, quantity, transaction_date) VALUES (?, ?, ?, ?)"
        )
        .bind(record.item_id)
        .bind(record.transaction_type.as_str())
        .bind(record.quantity)
        .bind(record.transaction_date)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let SqliteStockTransaction { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}
