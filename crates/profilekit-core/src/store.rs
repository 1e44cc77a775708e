//! Shared authentication/user state and the actions that mutate it.
//!
//! The store is owned outside the screen; the screen only reads snapshots and
//! dispatches typed actions through [`UserStore`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::UserRecord;

/// Actions accepted by the shared user store.
///
/// Serialized as `{"type": "UPDATE_USER", "payload": {...}}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
    /// Merge freshly fetched user data into the stored record.
    UpdateUser { data: UserRecord },
    /// Replace the session; `None` for both fields means logged out.
    UserLogin {
        user: Option<UserRecord>,
        access_token: Option<String>,
    },
}

impl UserAction {
    /// The logged-out session shape dispatched when a signup step completes.
    pub const fn logged_out() -> Self {
        Self::UserLogin {
            user: None,
            access_token: None,
        }
    }
}

impl fmt::Debug for UserAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateUser { data } => formatter
                .debug_struct("UpdateUser")
                .field("data", data)
                .finish(),
            Self::UserLogin { user, access_token } => formatter
                .debug_struct("UserLogin")
                .field("user", user)
                .field("access_token", &access_token.as_ref().map(|_| "[REDACTED]"))
                .finish(),
        }
    }
}

/// Snapshot of the shared auth slice.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserRecord>,
    pub access_token: Option<String>,
    /// Bumped on every applied action.
    pub version: u64,
}

impl AuthState {
    pub fn with_session(user: UserRecord, access_token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token.into()),
            version: 0,
        }
    }

    /// Reducer for [`UserAction`].
    pub fn apply(&mut self, action: UserAction) {
        match action {
            UserAction::UpdateUser { data } => match self.user.as_mut() {
                Some(user) => user.merge(data),
                None => self.user = Some(data),
            },
            UserAction::UserLogin { user, access_token } => {
                self.user = user;
                self.access_token = access_token;
            }
        }
        self.version = self.version.wrapping_add(1);
    }

    pub const fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthState")
            .field("user", &self.user)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("version", &self.version)
            .finish()
    }
}

/// Injected read/dispatch interface over the shared user state.
pub trait UserStore: Send + Sync {
    fn current(&self) -> AuthState;
    fn dispatch(&self, action: UserAction);
    /// Receiver notified after every dispatch.
    fn subscribe(&self) -> watch::Receiver<AuthState>;
}

/// In-process store backed by a `watch` channel.
#[derive(Debug)]
pub struct MemoryUserStore {
    state: watch::Sender<AuthState>,
}

impl MemoryUserStore {
    pub fn new(initial: AuthState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new(AuthState::default())
    }
}

impl UserStore for MemoryUserStore {
    fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: UserAction) {
        tracing::debug!(?action, "dispatching user action");
        self.state.send_modify(|state| state.apply(action));
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
