//! Application state for the web layer.

use std::sync::Arc;

use crate::gateway::RainfallGateway;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached rainfall lookups
    pub gateway: Arc<RainfallGateway>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(gateway: RainfallGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
