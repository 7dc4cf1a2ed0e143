use crate::auth::SessionStore;
use crate::config::Config;
use crate::session::ProctorSession;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The active proctoring session, if any. One client runs at most one
    /// session at a time.
    pub session: Arc<RwLock<Option<Arc<ProctorSession>>>>,

    /// Credential slot shared with the session engine
    pub store: SessionStore,

    /// Service configuration (analyzer endpoints, cadence, capture dims)
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            store: SessionStore::new(),
            config: Arc::new(config),
        }
    }
}
