use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use askama::Template;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, InventoryError},
    filters,
    handlers::render,
    middleware::{set_flash, take_flash, Flash},
    models::{ItemDisplay, LedgerEntryDisplay},
    services::catalog,
    state::AppState,
};

#[derive(Template)]
#[template(path = "view_ledger.html")]
struct LedgerTemplate {
    item: ItemDisplay,
    entries: Vec<LedgerEntryDisplay>,
    total_issued: i64,
    flash: Option<Flash>,
}

pub async fn view_ledger(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(item_id): Path<i64>,
) -> Result<Response, AppError> {
    let (item, entries) = match catalog::item_ledger(state.store.as_ref(), item_id).await {
        Ok(found) => found,
        Err(InventoryError::NotFound(_)) => {
            set_flash(&cookies, &state.flash_key, Flash::danger("Item not found."));
            return Ok(Redirect::to("/").into_response());
        }
        Err(err) => return Err(err.into()),
    };

    let total_issued: i64 = entries.iter().map(|entry| entry.quantity).sum();

    let template = LedgerTemplate {
        item: ItemDisplay::from(item),
        entries: entries.into_iter().map(LedgerEntryDisplay::from).collect(),
        total_issued,
        flash: take_flash(&cookies, &state.flash_key),
    };
    Ok(render(&template)?.into_response())
}
