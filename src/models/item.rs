use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub cost_per_unit: f64,
    pub total_cost: f64,
    pub selling_price: f64,
    pub supplier: Option<String>,
    pub date_added: NaiveDate,
    pub last_updated: Option<NaiveDate>,
    pub location: Option<String>,
    pub min_stock_level: Option<i64>,
    pub max_stock_level: Option<i64>,
    pub reorder_quantity: Option<i64>,
    pub notes: Option<String>,
    pub current_date: NaiveDate,
    pub is_active: bool,
}

impl Item {
    /// True when the on-hand quantity has reached the advisory minimum.
    pub fn is_low_stock(&self) -> bool {
        self.min_stock_level
            .map(|min| self.quantity <= min)
            .unwrap_or(false)
    }
}

/// A validated item ready to be inserted. `id` is `None` when the store
/// should assign the next identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub cost_per_unit: f64,
    pub selling_price: f64,
    pub supplier: Option<String>,
    pub date_added: NaiveDate,
    pub location: Option<String>,
    pub min_stock_level: Option<i64>,
    pub max_stock_level: Option<i64>,
    pub reorder_quantity: Option<i64>,
    pub notes: Option<String>,
    pub current_date: NaiveDate,
}

impl NewItem {
    // Fixed at creation; updates to quantity do not touch it.
    pub fn total_cost(&self) -> f64 {
        self.quantity as f64 * self.cost_per_unit
    }

    pub fn into_item(self, id: i64) -> Item {
        let total_cost = self.total_cost();
        Item {
            id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            cost_per_unit: self.cost_per_unit,
            total_cost,
            selling_price: self.selling_price,
            supplier: self.supplier,
            date_added: self.date_added,
            last_updated: None,
            location: self.location,
            min_stock_level: self.min_stock_level,
            max_stock_level: self.max_stock_level,
            reorder_quantity: self.reorder_quantity,
            notes: self.notes,
            current_date: self.current_date,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemUpdate {
    pub quantity: i64,
    pub selling_price: f64,
    pub updated_on: NaiveDate,
}

// Template-friendly display version for listing and detail views
#[derive(Debug, Serialize)]
pub struct ItemDisplay {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub cost_per_unit: f64,
    pub total_cost: f64,
    pub selling_price: f64,
    pub supplier: String,
    pub date_added: String,
    pub last_updated: String,
    pub location: String,
    pub min_stock_level: String,
    pub max_stock_level: String,
    pub reorder_quantity: String,
    pub notes: String,
    pub low_stock: bool,
    pub is_active: bool,
}

impl From<Item> for ItemDisplay {
    fn from(item: Item) -> Self {
        let low_stock = item.is_low_stock();
        let level = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
        Self {
            id: item.id,
            name: item.name,
            quantity: item.quantity,
            unit: item.unit,
            cost_per_unit: item.cost_per_unit,
            total_cost: item.total_cost,
            selling_price: item.selling_price,
            supplier: item.supplier.unwrap_or_default(),
            date_added: item.date_added.format("%Y-%m-%d").to_string(),
            last_updated: item
                .last_updated
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            location: item.location.unwrap_or_default(),
            min_stock_level: level(item.min_stock_level),
            max_stock_level: level(item.max_stock_level),
            reorder_quantity: level(item.reorder_quantity),
            notes: item.notes.unwrap_or_default(),
            low_stock,
            is_active: item.is_active,
        }
    }
}
