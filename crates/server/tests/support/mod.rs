#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN: &str = "admin";
pub const PASSWORD: &str = "letmein";
pub const INDEX_HTML: &str = "<!doctype html><title>Zarvis</title>";

/// Config rooted in a throwaway directory with a one-file static site.
pub fn test_config() -> AppConfig {
    let root = std::env::temp_dir().join(format!("zarvis_server_{}", Uuid::new_v4()));
    let public = root.join("public");
    std::fs::create_dir_all(&public).expect("create static dir");
    std::fs::write(public.join("index.html"), INDEX_HTML).expect("write index.html");

    let mut cfg = AppConfig::default();
    cfg.server.static_dir = public.to_string_lossy().into_owned();
    cfg.storage.data_dir = root.join("data").to_string_lossy().into_owned();
    cfg.auth.admin_username = ADMIN.into();
    cfg.auth.admin_password = PASSWORD.into();
    cfg.normalize_and_validate().expect("valid test config");
    cfg
}

pub async fn app() -> anyhow::Result<Router> {
    app_with(test_config()).await
}

/// Same throwaway setup, served as the production build.
pub async fn production_app() -> anyhow::Result<Router> {
    let mut cfg = test_config();
    cfg.environment = "production".into();
    cfg.normalize_and_validate()?;
    app_with(cfg).await
}

async fn app_with(cfg: AppConfig) -> anyhow::Result<Router> {
    let state = server::build_state(&cfg).await?;
    Ok(server::build_app(&cfg, state))
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl Reply {
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(header::SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of the Set-Cookie header, ready to send back.
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie().and_then(|c| c.split(';').next()).map(str::to_string)
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>, body: Option<&str>) -> anyhow::Result<Reply> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        req = req.header(header::COOKIE, c);
    }
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(b.to_string()))?,
        None => req.body(Body::empty())?,
    };

    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok(Reply { status, headers, body, text })
}

/// Log in as the configured admin and return the cookie pair to replay.
pub async fn login(app: &Router) -> anyhow::Result<String> {
    let body = format!(r#"{{"username":"{ADMIN}","password":"{PASSWORD}"}}"#);
    let reply = send(app, "POST", "/auth/login", None, Some(&body)).await?;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.text);
    reply.cookie_pair().ok_or_else(|| anyhow::anyhow!("login set no cookie"))
}

pub async fn snapshot(app: &Router) -> anyhow::Result<Value> {
    let reply = send(app, "GET", "/content", None, None).await?;
    assert_eq!(reply.status, StatusCode::OK);
    Ok(reply.body)
}
