//! Observable session state and the shared auth guard.
//!
//! The hosted identity provider owns the session lifecycle; this module
//! mirrors it as a process-wide observable value. Pages subscribe for the
//! duration of their active lifetime and unsubscribe by dropping the
//! receiver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use escriba_core::error::{EscribaError, Result};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

/// An authenticated session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: UserInfo,
}

impl Session {
    /// True when the token's expiry has passed. Sessions without an expiry
    /// never expire locally; the backend remains the authority.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now(),
            None => false,
        }
    }
}

/// Process-wide observable session value.
///
/// `subscribe` hands out a `watch` receiver; dropping it is the
/// unsubscribe, so a page's subscription cannot outlive the page.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Subscribes to session changes for a page's active lifetime.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Installs a new session (sign-in or refresh).
    pub fn set(&self, session: Session) {
        let _ = self.tx.send(Some(session));
    }

    /// Drops the session (sign-out or expiry).
    pub fn clear(&self) {
        let _ = self.tx.send(None);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The single auth guard every protected surface routes through.
pub struct SessionGuard;

impl SessionGuard {
    /// Returns the active session or an auth error directing the person to
    /// the authentication entry point.
    pub fn require(store: &SessionStore) -> Result<Session> {
        match store.current() {
            Some(session) if !session.is_expired() => Ok(session),
            Some(_) => Err(EscribaError::auth(
                "Session expired. Sign in again with `escriba login`.",
            )),
            None => Err(EscribaError::auth(
                "No active session. Sign in with `escriba login`.",
            )),
        }
    }
}
