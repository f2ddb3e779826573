use chrono::NaiveDate;

use crate::{
    error::InventoryError,
    models::{Item, ItemUpdate, LedgerEntry, NewItem},
    store::{InventoryStore, StoreError},
};

pub async fn add_item(store: &dyn InventoryStore, item: NewItem) -> Result<Item, InventoryError> {
    validate_new_item(&item)?;

    match store.insert_item(&item).await {
        Ok(created) => {
            log::info!("added item {} ({})", created.id, created.name);
            Ok(created)
        }
        Err(StoreError::DuplicateItem(id)) => {
            Err(InventoryError::validation(format!("Item {} already exists.", id)))
        }
        Err(err) => Err(err.into()),
    }
}

fn validate_new_item(item: &NewItem) -> Result<(), InventoryError> {
    if let Some(id) = item.id {
        if id <= 0 {
            return Err(InventoryError::validation("Item ID must be greater than zero."));
        }
    }
    if item.name.trim().is_empty() {
        return Err(InventoryError::validation("Name is required."));
    }
    if item.unit.trim().is_empty() {
        return Err(InventoryError::validation("Unit is required."));
    }
    if item.quantity < 0 {
        return Err(InventoryError::validation("Quantity cannot be negative."));
    }
    if !(item.cost_per_unit.is_finite() && item.cost_per_unit >= 0.0) {
        return Err(InventoryError::validation("Cost per unit cannot be negative."));
    }
    if !(item.selling_price.is_finite() && item.selling_price >= 0.0) {
        return Err(InventoryError::validation("Selling price cannot be negative."));
    }
    for (label, level) in [
        ("Minimum stock level", item.min_stock_level),
        ("Maximum stock level", item.max_stock_level),
        ("Reorder quantity", item.reorder_quantity),
    ] {
        if level.is_some_and(|n| n < 0) {
            return Err(InventoryError::validation(format!("{} cannot be negative.", label)));
        }
    }
    if let (Some(min), Some(max)) = (item.min_stock_level, item.max_stock_level) {
        if min > max {
            return Err(InventoryError::validation(
                "Minimum stock level cannot exceed the maximum.",
            ));
        }
    }
    Ok(())
}

pub async fn list_items(store: &dyn InventoryStore) -> Result<Vec<Item>, InventoryError> {
    Ok(store.list_items().await?)
}

/// A blank term lists the whole catalog.
pub async fn search_items(store: &dyn InventoryStore, term: &str) -> Result<Vec<Item>, InventoryError> {
    let term = term.trim();
    if term.is_empty() {
        return list_items(store).await;
    }
    Ok(store.search_items(term).await?)
}

/// Fetches an item that can still be edited or issued.
pub async fn active_item(store: &dyn InventoryStore, id: i64) -> Result<Item, InventoryError> {
    store
        .find_item(id)
        .await?
        .filter(|item| item.is_active)
        .ok_or(InventoryError::NotFound(id))
}

pub async fn update_item(
    store: &dyn InventoryStore,
    id: i64,
    quantity: i64,
    selling_price: f64,
    today: NaiveDate,
) -> Result<(), InventoryError> {
    if quantity < 0 {
        return Err(InventoryError::validation("Quantity cannot be negative."));
    }
    if !(selling_price.is_finite() && selling_price >= 0.0) {
        return Err(InventoryError::validation("Selling price cannot be negative."));
    }

    let update = ItemUpdate { quantity, selling_price, updated_on: today };
    if !store.update_item(id, &update).await? {
        return Err(InventoryError::NotFound(id));
    }

    log::info!("updated item {}: quantity={} selling_price={}", id, quantity, selling_price);
    Ok(())
}

/// Archives the item. Its ledger history stays readable.
pub async fn delete_item(store: &dyn InventoryStore, id: i64) -> Result<(), InventoryError> {
    if !store.archive_item(id).await? {
        return Err(InventoryError::NotFound(id));
    }
    log::info!("archived item {}", id);
    Ok(())
}

/// The item (archived or not) together with its transaction history.
pub async fn item_ledger(
    store: &dyn InventoryStore,
    id: i64,
) -> Result<(Item, Vec<LedgerEntry>), InventoryError> {
    let item = store.find_item(id).await?.ok_or(InventoryError::NotFound(id))?;
    let entries = store.ledger_for_item(id).await?;
    Ok((item, entries))
}
