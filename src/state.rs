use std::sync::Arc;
use tower_cookies::Key;

use crate::store::InventoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub flash_key: Key,
}

impl AppState {
    pub fn new(store: Arc<dyn InventoryStore>, flash_key: Key) -> Self {
        Self { store, flash_key }
    }
}
