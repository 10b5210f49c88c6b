use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use configs::AppConfig;
use service::{
    auth::AuthService,
    content::{ContentService, SeaOrmContentRepository},
    file::FileSessionStore,
};

/// Shared handler state; clones are cheap.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<FileSessionStore>>,
    pub content: Arc<ContentService<SeaOrmContentRepository>>,
    pub cookie: CookiePolicy,
}

/// Attributes of the session cookie.
#[derive(Clone, Debug)]
pub struct CookiePolicy {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_secs: i64,
}

impl CookiePolicy {
    /// Lax and plain-HTTP in development; Strict and Secure in production.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let production = cfg.is_production();
        Self {
            name: cfg.auth.cookie_name.clone(),
            secure: production,
            same_site: if production { SameSite::Strict } else { SameSite::Lax },
            max_age_secs: i64::try_from(cfg.auth.session_ttl_secs).unwrap_or(i64::MAX),
        }
    }

    fn base(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .build()
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = self.base(token);
        cookie.set_max_age(time::Duration::seconds(self.max_age_secs));
        cookie
    }

    /// Cookie value that tells the client to drop its session cookie. Carries
    /// the same attributes as the session cookie it replaces.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        self.base(String::new())
    }
}
