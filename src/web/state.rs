use crate::registry::AdapterRegistry;

use std::sync::Arc;

pub type SharedState = Arc<AppState>;

/// What the handlers share. The registry is fixed once the server starts,
/// so it needs no lock; the adapters' caches synchronize themselves.
pub struct AppState {
    registry: AdapterRegistry,
}

impl AppState {
    pub fn new(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }
}
