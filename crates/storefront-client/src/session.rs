use std::sync::Arc;

use storefront_core::{Action, AppState};
use tokio::sync::RwLock;

/// Shared handle to the application state.
///
/// Cloning the handle shares the same state; every write goes through
/// [`SessionStore::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    state: Arc<RwLock<AppState>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn dispatch(&self, action: Action) {
        let mut guard = self.state.write().await;
        let current = std::mem::take(&mut *guard);
        *guard = current.reduce(action);
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token().map(str::to_owned)
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.auth.refresh_token.clone()
    }
}
