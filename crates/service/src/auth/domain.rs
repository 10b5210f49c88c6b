use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Identity attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
}

/// Login result: identity plus the opaque token the client must present
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Server-side session record, persisted by a [`super::session_store::SessionStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Proof that the caller holds a live session.
///
/// Only [`super::AuthService::authorize`] hands these out, and every content
/// mutation takes one, so no mutation can run on behalf of an anonymous caller.
#[derive(Debug, Clone)]
pub struct Authenticated {
    user: AuthUser,
}

impl Authenticated {
    pub(crate) fn new(user: AuthUser) -> Self {
        Self { user }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}
