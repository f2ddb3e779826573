use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

/// Failures of catalog operations and the issuance workflow.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Item {0} not found.")]
    NotFound(i64),
    #[error("{0}")]
    Validation(String),
    #[error("Cannot issue {requested} {name}: only {available} in stock.")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl InventoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        InventoryError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::Validation(_) => StatusCode::BAD_REQUEST,
            InventoryError::InsufficientStock { .. } => StatusCode::CONFLICT,
            InventoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error type for handlers that render a page rather than redirecting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error("template error: {0}")]
    Render(#[from] askama::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Inventory(InventoryError::Storage(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Inventory(err) => err.status_code(),
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("request failed: {}", self);
            return (status, Html("<h1>Something went wrong</h1>".to_string())).into_response();
        }

        log::warn!("request rejected: {}", self);
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, Html(format!("<h1>{}</h1>", reason))).into_response()
    }
}
