use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use tracing::{info, warn, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, Authenticated, LoginInput, SessionRecord};
use super::errors::AuthError;
use super::session_store::SessionStore;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub admin_username: String,
    pub admin_password: String,
    /// Inactivity window after which a session lapses.
    pub session_ttl: Duration,
}

/// Sessions are re-stamped only when their expiry has drifted by more than
/// this, so a burst of requests does not rewrite the store each time.
const TOUCH_GRANULARITY_SECS: i64 = 60;

/// Auth business service independent of web framework
pub struct AuthService<S: SessionStore> {
    store: Arc<S>,
    credential_hash: String,
    session_ttl: Duration,
}

/// Both fields go through a single Argon2 verification, so a mismatch in
/// either one costs the same and reveals nothing about which was wrong.
fn credential_material(username: &str, password: &str) -> String {
    format!("{username}\u{0}{password}")
}

fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

impl<S: SessionStore> AuthService<S> {
    /// Build the service, hashing the configured credential pair once.
    pub fn new(store: Arc<S>, cfg: AuthConfig) -> Result<Self, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let credential_hash = Argon2::default()
            .hash_password(credential_material(&cfg.admin_username, &cfg.admin_password).as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        Ok(Self { store, credential_hash, session_ttl: cfg.session_ttl })
    }

    fn verify(&self, input: &LoginInput) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(&self.credential_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        let material = credential_material(&input.username, &input.password);
        Ok(Argon2::default().verify_password(material.as_bytes(), &parsed).is_ok())
    }

    /// Check the credential pair and open a session.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, session_store::mock::MockSessionStore};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let store = Arc::new(MockSessionStore::default());
    /// let cfg = AuthConfig { admin_username: "admin".into(), admin_password: "s3cret".into(), session_ttl: chrono::Duration::hours(8) };
    /// let svc = AuthService::new(store, cfg).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "admin".into(), password: "s3cret".into() })).unwrap();
    /// assert_eq!(session.user.username, "admin");
    /// assert!(tokio_test::block_on(svc.current_user(Some(&session.token))).is_some());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        if !self.verify(&input)? {
            warn!(event = "login_failed", "invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let token = new_token();
        let now = Utc::now();
        let expires_at = now + self.session_ttl;
        let record = SessionRecord { username: input.username.clone(), created_at: now, expires_at };
        self.store.save(&token, record).await?;

        info!(event = "login", %expires_at, "admin session opened");
        Ok(AuthSession { user: AuthUser { username: input.username }, token, expires_at })
    }

    /// Destroy the session behind `token`. Fails only when the store cannot
    /// persist the removal.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.store.destroy(token).await?;
        info!(event = "logout", "admin session closed");
        Ok(())
    }

    /// Identity behind `token`, if the session is live. Never fails: store
    /// faults are logged and treated as anonymous.
    pub async fn current_user(&self, token: Option<&str>) -> Option<AuthUser> {
        match self.resolve(token).await {
            Ok(user) => user,
            Err(e) => {
                warn!(event = "session_lookup_failed", error = %e, "treating caller as anonymous");
                None
            }
        }
    }

    /// Gate for mutating operations.
    pub async fn authorize(&self, token: Option<&str>) -> Result<Authenticated, AuthError> {
        self.resolve(token)
            .await?
            .map(Authenticated::new)
            .ok_or(AuthError::Unauthorized)
    }

    async fn resolve(&self, token: Option<&str>) -> Result<Option<AuthUser>, AuthError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else { return Ok(None) };
        let Some(record) = self.store.load(token).await? else { return Ok(None) };

        let renewed = Utc::now() + self.session_ttl;
        if renewed - record.expires_at > Duration::seconds(TOUCH_GRANULARITY_SECS) {
            if let Err(e) = self.store.touch(token, renewed).await {
                warn!(event = "session_touch_failed", error = %e, "session expiry not extended");
            }
        }
        Ok(Some(AuthUser { username: record.username }))
    }
}
