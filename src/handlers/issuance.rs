use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use askama::Template;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, InventoryError},
    handlers::{render, today},
    middleware::{set_flash, take_flash, Flash},
    models::{IssuedItemDisplay, ItemDisplay},
    services::{catalog, issue_item as run_issuance, IssueRequest},
    state::AppState,
};

#[derive(Template)]
#[template(path = "issue_item.html")]
struct IssueItemTemplate {
    items: Vec<ItemDisplay>,
    selected_id: String,
    flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "view_issued_items.html")]
struct IssuedItemsTemplate {
    issued_items: Vec<IssuedItemDisplay>,
    flash: Option<Flash>,
}

#[derive(Deserialize)]
pub struct IssueQuery {
    item_id: Option<String>,
}

#[derive(Deserialize)]
pub struct IssueForm {
    #[serde(default)]
    item_id: String,
    #[serde(default)]
    quantity_issued: String,
    #[serde(default)]
    department_name: String,
}

pub async fn issue_item_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<IssueQuery>,
) -> Result<Html<String>, AppError> {
    let items = catalog::list_items(state.store.as_ref()).await?;

    let template = IssueItemTemplate {
        items: items.into_iter().map(ItemDisplay::from).collect(),
        selected_id: query.item_id.unwrap_or_default().trim().to_string(),
        flash: take_flash(&cookies, &state.flash_key),
    };
    render(&template)
}

pub async fn issue_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<IssueForm>,
) -> Redirect {
    log::debug!(
        "issue request: item_id={:?} quantity_issued={:?} department_name={:?}",
        form.item_id, form.quantity_issued, form.department_name
    );

    let result = match IssueRequest::parse(&form.item_id, &form.quantity_issued, &form.department_name) {
        Ok(request) => run_issuance(state.store.as_ref(), &request, today()).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(outcome) => {
            set_flash(&cookies, &state.flash_key, Flash::success(outcome.message()));
            Redirect::to("/view_issued_items")
        }
        Err(err) => {
            let message = match &err {
                InventoryError::Storage(store_err) => {
                    log::error!("error issuing item: {}", store_err);
                    format!("Error issuing item: {}", store_err)
                }
                other => format!("Failed to issue item. {}", other),
            };
            set_flash(&cookies, &state.flash_key, Flash::danger(message));
            Redirect::to("/issue_item")
        }
    }
}

pub async fn view_issued_items(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let issued_items = state.store.list_issued_items().await?;

    let template = IssuedItemsTemplate {
        issued_items: issued_items.into_iter().map(IssuedItemDisplay::from).collect(),
        flash: take_flash(&cookies, &state.flash_key),
    };
    render(&template)
}
