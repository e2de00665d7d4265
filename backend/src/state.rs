//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::database::DataStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, config: Config) -> Self {
        AppState {
            store,
            config: Arc::new(config),
        }
    }
}
