//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use mockapi_store::DataStore;

use crate::config::ApiConfig;

/// Application state shared across all handlers.
///
/// Reads take the store's read lock; mutations take the write lock for the
/// whole load-mutate-save cycle.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// The collection store.
    pub store: Arc<RwLock<DataStore>>,
}

impl AppState {
    /// Creates a new AppState owning the given store.
    pub fn new(config: ApiConfig, store: DataStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
        }
    }
}
