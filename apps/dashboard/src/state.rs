use std::sync::Arc;

use crate::submissions::CandidateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. Default: `JsonFileStore` over `DATA_FILE`.
    pub store: Arc<dyn CandidateStore>,
}
