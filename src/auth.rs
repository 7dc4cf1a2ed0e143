use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// Credentials the engine carries on every analyzer call.
///
/// Owned by the external auth system; the engine only reads them and clears
/// the token when an analyzer rejects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Stable student identifier used by the analyzers
    pub user_id: String,

    /// Display name, echoed to the analyzers alongside the id
    pub username: String,

    /// Bearer token for the analyzer endpoints
    pub token: String,
}

/// Shared handle to the session credential slot.
///
/// Cheap to clone; all clones observe the same slot.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install credentials for the current user.
    pub async fn sign_in(&self, credentials: Credentials) {
        info!("Credentials installed for user {}", credentials.user_id);
        *self.inner.write().await = Some(credentials);
    }

    /// Current credentials, if a token is held.
    pub async fn credentials(&self) -> Option<Credentials> {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Drop the stored token. Called when an analyzer answers 401; the
    /// surrounding application must re-authenticate before a new session
    /// can dispatch frames.
    pub async fn invalidate_token(&self) {
        let mut slot = self.inner.write().await;
        if slot.take().is_some() {
            info!("Session token invalidated");
        }
    }
}
