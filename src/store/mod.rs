use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

/// Authentication state shared by the admin console
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<Value>,
}

/// Session container with explicit setters and change notification.
///
/// Clones share the same state. Subscribers are woken after a setter runs and
/// always read the latest state; updates made before a subscriber looks are
/// coalesced into one notification rather than queued.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state: Arc::new(state) }
    }

    pub fn set_token(&self, token: Option<String>) {
        self.state.send_modify(|state| state.token = token);
    }

    pub fn set_user(&self, user: Option<Value>) {
        self.state.send_modify(|state| state.user = user);
    }

    /// Drop both token and user
    pub fn clear(&self) {
        self.state.send_replace(SessionState::default());
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<Value> {
        self.state.borrow().user.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
