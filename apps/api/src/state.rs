use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatClient;
use crate::storage::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: ChatClient,
    pub config: Config,
    /// User-credential repository. Unrelated to the career-matching flow;
    /// no recommendation handler reads or writes it.
    pub users: Arc<dyn UserStore>,
}
