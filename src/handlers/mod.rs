pub mod api;
pub mod inventory;
pub mod issuance;
pub mod ledger;

use askama::Template;
use axum::response::Html;
use chrono::{Local, NaiveDate};

use crate::error::AppError;

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

/// Dates recorded on items and ledgers use the server's local calendar day.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
