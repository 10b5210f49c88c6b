use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::SessionRecord;
use super::errors::AuthError;

/// Persistence for server-side sessions, keyed by opaque token.
///
/// Implementations own expiry: `load` must never return a record whose
/// `expires_at` has passed, and should drop such records when seen.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, AuthError>;
    async fn save(&self, token: &str, record: SessionRecord) -> Result<(), AuthError>;
    /// Move the expiry of a live session. Unknown tokens are ignored.
    async fn touch(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError>;
    async fn destroy(&self, token: &str) -> Result<(), AuthError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockSessionStore {
        sessions: Mutex<HashMap<String, SessionRecord>>,
        fail_destroy: AtomicBool,
    }

    impl MockSessionStore {
        /// Make every subsequent `destroy` fail, as a broken backing store would.
        pub fn fail_destroy(&self, fail: bool) {
            self.fail_destroy.store(fail, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.sessions.lock().map(|s| s.len()).unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionRecord>>, AuthError> {
            self.sessions.lock().map_err(|e| AuthError::Session(e.to_string()))
        }
    }

    #[async_trait]
    impl SessionStore for MockSessionStore {
        async fn load(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
            let mut sessions = self.lock()?;
            let now = Utc::now();
            if sessions.get(token).is_some_and(|rec| rec.is_expired(now)) {
                sessions.remove(token);
                return Ok(None);
            }
            Ok(sessions.get(token).cloned())
        }

        async fn save(&self, token: &str, record: SessionRecord) -> Result<(), AuthError> {
            self.lock()?.insert(token.to_string(), record);
            Ok(())
        }

        async fn touch(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
            if let Some(rec) = self.lock()?.get_mut(token) {
                rec.expires_at = expires_at;
            }
            Ok(())
        }

        async fn destroy(&self, token: &str) -> Result<(), AuthError> {
            if self.fail_destroy.load(Ordering::SeqCst) {
                return Err(AuthError::Session("destroy failed".into()));
            }
            self.lock()?.remove(token);
            Ok(())
        }
    }
}
