use crate::webhook::WebhookRouter;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Event router, which also owns the session store
    pub router: Arc<WebhookRouter>,
}

impl AppState {
    pub fn new(router: Arc<WebhookRouter>) -> Self {
        Self { router }
    }
}
