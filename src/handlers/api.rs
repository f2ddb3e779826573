use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use crate::{
    error::InventoryError,
    models::LedgerEntry,
    services::catalog,
    state::AppState,
};

#[derive(Serialize)]
pub struct ItemLedgerResponse {
    pub item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub is_active: bool,
    pub entries: Vec<LedgerEntry>,
}

pub async fn get_item_ledger(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<ItemLedgerResponse>, StatusCode> {
    let (item, entries) = catalog::item_ledger(state.store.as_ref(), item_id)
        .await
        .map_err(|err| {
            if let InventoryError::Storage(ref store_err) = err {
                log::error!("failed to load ledger for item {}: {}", item_id, store_err);
            }
            err.status_code()
        })?;

    Ok(Json(ItemLedgerResponse {
        item_id: item.id,
        name: item.name,
        quantity: item.quantity,
        is_active: item.is_active,
        entries,
    }))
}
