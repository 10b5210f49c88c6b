use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::{domain::SessionRecord, errors::AuthError, session_store::SessionStore};
use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// Session store persisted as a JSON map of `token -> SessionRecord`.
///
/// Lives next to the content database but in its own file, so session churn
/// never touches content tables.
#[derive(Clone)]
pub struct FileSessionStore {
    store: Arc<JsonMapStore<String, SessionRecord>>,
}

fn session_err(e: ServiceError) -> AuthError {
    AuthError::Session(e.to_string())
}

impl FileSessionStore {
    /// Open (or create) the store at `path`, dropping sessions that expired
    /// while the process was down.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, SessionRecord>::new(path).await?;
        let now = Utc::now();
        let purged = store.retain(|_, rec| !rec.is_expired(now)).await?;
        if purged > 0 {
            info!(event = "sessions_purged", purged, "expired sessions removed");
        }
        Ok(Arc::new(Self { store }))
    }

    pub async fn len(&self) -> usize {
        self.store.list().await.len()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
        let key = token.to_string();
        let Some(record) = self.store.get(&key).await else { return Ok(None) };
        if record.is_expired(Utc::now()) {
            if let Err(e) = self.store.remove(&key).await {
                warn!(event = "session_purge_failed", error = %e, "expired session left on disk");
            }
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn save(&self, token: &str, record: SessionRecord) -> Result<(), AuthError> {
        self.store.insert(token.to_string(), record).await.map_err(session_err)
    }

    async fn touch(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        self.store
            .update_map(|m| {
                if let Some(rec) = m.get_mut(token) {
                    rec.expires_at = expires_at;
                }
                Ok(())
            })
            .await
            .map_err(session_err)
    }

    async fn destroy(&self, token: &str) -> Result<(), AuthError> {
        self.store.remove(&token.to_string()).await.map(|_| ()).map_err(session_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("svc_sessions_{}.json", Uuid::new_v4()))
    }

    fn record(expires_in: Duration) -> SessionRecord {
        let now = Utc::now();
        SessionRecord { username: "admin".into(), created_at: now, expires_at: now + expires_in }
    }

    #[tokio::test]
    async fn sessions_survive_reopen() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = FileSessionStore::open(&tmp).await?;
        store.save("tok", record(Duration::hours(8))).await?;

        let reopened = FileSessionStore::open(&tmp).await?;
        let rec = reopened.load("tok").await?.expect("session persisted");
        assert_eq!(rec.username, "admin");

        reopened.destroy("tok").await?;
        assert!(FileSessionStore::open(&tmp).await?.load("tok").await?.is_none());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn expired_sessions_are_never_returned() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = FileSessionStore::open(&tmp).await?;
        store.save("old", record(Duration::seconds(-5))).await?;
        store.save("live", record(Duration::hours(1))).await?;

        assert!(store.load("old").await?.is_none());
        assert_eq!(store.len().await, 1);

        store.save("old2", record(Duration::seconds(-5))).await?;
        let reopened = FileSessionStore::open(&tmp).await?;
        assert_eq!(reopened.len().await, 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn touch_moves_expiry_and_ignores_unknown() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = FileSessionStore::open(&tmp).await?;
        store.save("tok", record(Duration::minutes(1))).await?;

        let later = Utc::now() + Duration::hours(8);
        store.touch("tok", later).await?;
        store.touch("ghost", later).await?;
        assert_eq!(store.load("tok").await?.map(|r| r.expires_at), Some(later));
        assert_eq!(store.len().await, 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn destroy_reports_write_failure() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = FileSessionStore::open(&tmp).await?;
        store.save("tok", record(Duration::hours(1))).await?;

        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        assert!(matches!(store.destroy("tok").await, Err(AuthError::Session(_))));
        assert!(store.load("tok").await?.is_some());

        let _ = tokio::fs::remove_dir(&tmp).await;
        Ok(())
    }
}
