mod config;
mod database;
mod error;
mod filters;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;
mod store;
mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use config::AppConfig;
use database::create_database_pool;
use state::AppState;
use store::SqliteStore;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("stockroom failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let db = create_database_pool(&config.database_url).await?;
    let state = AppState::new(Arc::new(SqliteStore::new(db)), config.flash_key.clone());

    // Build the application router
    let app = create_router(state);

    let addr = config.bind_address();
    log::info!("stockroom listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // Inventory
        .route("/", get(handlers::inventory::display_inventory))
        .route("/search_inventory", get(handlers::inventory::search_inventory))
        .route("/add_item", get(handlers::inventory::add_item_page).post(handlers::inventory::add_item))
        .route(
            "/update_item/:id",
            get(handlers::inventory::update_item_page).post(handlers::inventory::update_item),
        )
        .route("/delete_item/:id", get(handlers::inventory::delete_item))

        // Issuance
        .route("/issue_item", get(handlers::issuance::issue_item_page).post(handlers::issuance::issue_item))
        .route("/view_issued_items", get(handlers::issuance::view_issued_items))

        // Ledger
        .route("/view_ledger/:id", get(handlers::ledger::view_ledger))

        // API routes
        .route("/api/items/:id/ledger", get(handlers::api::get_item_ledger))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
        )
        .with_state(state)
}
