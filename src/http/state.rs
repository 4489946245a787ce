//! Application state for the HTTP server.

use std::sync::Arc;

use crate::store::EventStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Event store queried by the availability pipeline
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    /// Create a new application state over the given store.
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }
}
