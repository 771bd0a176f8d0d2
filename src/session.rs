//! Sessions
//!
//! Ephemeral per-client authenticated identity. A [`Session`] is either
//! anonymous or carries the identity of a logged-in user, and is threaded
//! explicitly through request handling rather than living in ambient
//! state. The [`SessionStore`] maps opaque bearer tokens to identities
//! in process memory only; every session dies with logout or restart.

use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Identity of a logged-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// Per-client authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    /// Associate a user identity with this session
    pub fn start(&mut self, user_id: i64, username: impl Into<String>) {
        *self = Session::Authenticated(Identity {
            user_id,
            username: username.into(),
        });
    }

    /// The authenticated identity, if any
    pub fn current(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Anonymous => None,
        }
    }

    /// Clear all identity data, returning to the anonymous state
    pub fn end(&mut self) {
        *self = Session::Anonymous;
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn into_identity(self) -> Option<Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Anonymous => None,
        }
    }
}

/// In-process store mapping bearer tokens to identities
///
/// Nothing here touches durable storage: tokens are only as long-lived
/// as the process, which is exactly the lifetime sessions are meant to
/// have.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Identity>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for a logged-in user
    pub async fn issue(&self, user_id: i64, username: &str) -> String {
        let token_bytes: [u8; 32] = rand::thread_rng().gen();
        let token = hex_encode(&token_bytes);

        let identity = Identity {
            user_id,
            username: username.to_string(),
        };
        self.sessions
            .write()
            .await
            .insert(token.clone(), identity);

        token
    }

    /// Resolve a token to the session it represents
    ///
    /// Unknown tokens resolve to an anonymous session, not an error.
    pub async fn resolve(&self, token: &str) -> Session {
        match self.sessions.read().await.get(token) {
            Some(identity) => Session::Authenticated(identity.clone()),
            None => Session::Anonymous,
        }
    }

    /// Invalidate a token; returns whether it was active
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

fn hex_encode(data: &[u8]) -> String {
    use std::fmt::Write;
    let mut result = String::new();
    for byte in data {
        write!(result, "{:02x}", byte).unwrap();
    }
    result
}
