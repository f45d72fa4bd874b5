// Application state module
// Bundles configuration with the injected storage backend

use std::sync::Arc;

use super::types::Config;
use crate::store::SimulationStore;

/// Shared application state, constructed once in `main` and passed to every
/// handler. The store is a trait object so tests can swap in a fake backend.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SimulationStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn SimulationStore>) -> Self {
        Self { config, store }
    }
}
