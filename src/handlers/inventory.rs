use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use askama::Template;
use chrono::NaiveDate;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, InventoryError},
    filters,
    handlers::{render, today},
    middleware::{set_flash, take_flash, Flash},
    models::{ItemDisplay, NewItem},
    services::catalog,
    state::AppState,
    utils::{blank_to_none, parse_date_or, parse_field, parse_optional_field, parse_positive_id},
};

#[derive(Template)]
#[template(path = "inventory.html")]
struct InventoryTemplate {
    items: Vec<ItemDisplay>,
    search: String,
    flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "add_item.html")]
struct AddItemTemplate {
    current_date: String,
    flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "update_item.html")]
struct UpdateItemTemplate {
    item: ItemDisplay,
    flash: Option<Flash>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    search: String,
}

// Every field arrives as text so bad input becomes a flash message, not a 422.
#[derive(Deserialize)]
pub struct ItemForm {
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    cost_per_unit: String,
    #[serde(default)]
    selling_price: String,
    supplier: Option<String>,
    date_added: Option<String>,
    location: Option<String>,
    min_stock_level: Option<String>,
    max_stock_level: Option<String>,
    reorder_quantity: Option<String>,
    notes: Option<String>,
}

impl ItemForm {
    fn into_new_item(self, today: NaiveDate) -> Result<NewItem, InventoryError> {
        let id = match blank_to_none(self.id) {
            Some(raw) => Some(parse_positive_id(&raw).ok_or_else(|| {
                InventoryError::validation("Item ID must be a whole number greater than zero.")
            })?),
            None => None,
        };

        Ok(NewItem {
            id,
            name: self.name.trim().to_string(),
            quantity: parse_field("Quantity", &self.quantity)?,
            unit: self.unit.trim().to_string(),
            cost_per_unit: parse_field("Cost per unit", &self.cost_per_unit)?,
            selling_price: parse_field("Selling price", &self.selling_price)?,
            supplier: blank_to_none(self.supplier),
            date_added: parse_date_or("Date added", self.date_added, today)?,
            location: blank_to_none(self.location),
            min_stock_level: parse_optional_field("Minimum stock level", self.min_stock_level)?,
            max_stock_level: parse_optional_field("Maximum stock level", self.max_stock_level)?,
            reorder_quantity: parse_optional_field("Reorder quantity", self.reorder_quantity)?,
            notes: blank_to_none(self.notes),
            current_date: today,
        })
    }
}

#[derive(Deserialize)]
pub struct UpdateItemForm {
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    price: String,
}

/// Flash text for a failed form submission. Storage failures are logged
/// here since they never reach an error response.
fn failure_message(context: &str, err: &InventoryError) -> String {
    match err {
        InventoryError::Storage(store_err) => {
            log::error!("{}: {}", context, store_err);
            format!("{}: {}", context, store_err)
        }
        other => other.to_string(),
    }
}

pub async fn display_inventory(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let items = catalog::list_items(state.store.as_ref()).await?;

    let template = InventoryTemplate {
        items: items.into_iter().map(ItemDisplay::from).collect(),
        search: String::new(),
        flash: take_flash(&cookies, &state.flash_key),
    };
    render(&template)
}

pub async fn search_inventory(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, AppError> {
    let items = catalog::search_items(state.store.as_ref(), &query.search).await?;

    let template = InventoryTemplate {
        items: items.into_iter().map(ItemDisplay::from).collect(),
        search: query.search.trim().to_string(),
        flash: take_flash(&cookies, &state.flash_key),
    };
    render(&template)
}

pub async fn add_item_page(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let template = AddItemTemplate {
        current_date: today().format("%Y-%m-%d").to_string(),
        flash: take_flash(&cookies, &state.flash_key),
    };
    render(&template)
}

pub async fn add_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<ItemForm>,
) -> Redirect {
    let result = match form.into_new_item(today()) {
        Ok(new_item) => catalog::add_item(state.store.as_ref(), new_item).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(item) => {
            set_flash(&cookies, &state.flash_key, Flash::success(format!("Added {} (ID {}).", item.name, item.id)));
            Redirect::to("/")
        }
        Err(err) => {
            let message = failure_message("Error adding item", &err);
            set_flash(&cookies, &state.flash_key, Flash::danger(message));
            Redirect::to("/add_item")
        }
    }
}

pub async fn update_item_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(item_id): Path<i64>,
) -> Result<Response, AppError> {
    match catalog::active_item(state.store.as_ref(), item_id).await {
        Ok(item) => {
            let template = UpdateItemTemplate {
                item: ItemDisplay::from(item),
                flash: take_flash(&cookies, &state.flash_key),
            };
            Ok(render(&template)?.into_response())
        }
        Err(InventoryError::NotFound(_)) => {
            set_flash(&cookies, &state.flash_key, Flash::danger("Item not found."));
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn update_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(item_id): Path<i64>,
    Form(form): Form<UpdateItemForm>,
) -> Redirect {
    let parsed = parse_field::<i64>("Quantity", &form.quantity)
        .and_then(|quantity| Ok((quantity, parse_field::<f64>("Price", &form.price)?)));

    let result = match parsed {
        Ok((quantity, price)) => {
            catalog::update_item(state.store.as_ref(), item_id, quantity, price, today()).await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            set_flash(&cookies, &state.flash_key, Flash::success(format!("Item {} updated.", item_id)));
            Redirect::to("/")
        }
        Err(InventoryError::NotFound(_)) => {
            set_flash(&cookies, &state.flash_key, Flash::danger("Item not found."));
            Redirect::to("/")
        }
        Err(err) => {
            let message = failure_message("Error updating item", &err);
            set_flash(&cookies, &state.flash_key, Flash::danger(message));
            Redirect::to(&format!("/update_item/{}", item_id))
        }
    }
}

pub async fn delete_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(item_id): Path<i64>,
) -> Redirect {
    let flash = match catalog::delete_item(state.store.as_ref(), item_id).await {
        Ok(()) => Flash::success(format!("Item {} deleted.", item_id)),
        Err(InventoryError::NotFound(_)) => Flash::danger("Item not found."),
        Err(err) => Flash::danger(failure_message("Error deleting item", &err)),
    };
    set_flash(&cookies, &state.flash_key, flash);

    Redirect::to("/")
}
