//! Shared server state.

use std::sync::Arc;

use models::ModelRegistry;

/// State handed to every handler. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Published models, immutable after startup.
    pub registry: Arc<ModelRegistry>,
}

impl ServerState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}
