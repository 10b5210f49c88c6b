use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use models::store::Store;
use service::{
    auth::{service::AuthConfig, AuthService},
    content::{ContentService, SeaOrmContentRepository},
    file::FileSessionStore,
    runtime,
};
use tracing::{info, warn};

use crate::routes;
use crate::state::{CookiePolicy, ServerState};

/// Open storage, create and seed the content tables, open the session store
/// and assemble handler state. Any failure here is fatal for the process.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let store = Store::open(&cfg.database).await?;
    store.initialize().await?;
    if store.seed_if_empty().await? {
        info!(service = "server", event = "seeded", "default content written");
    }

    let sessions = FileSessionStore::open(cfg.storage.session_path()).await?;
    if cfg.auth.uses_default_credentials() {
        warn!(service = "server", event = "default_credentials", "admin credentials are the shipped defaults; set ADMIN_USERNAME and ADMIN_PASSWORD");
    }
    let auth = AuthService::new(
        sessions,
        AuthConfig {
            admin_username: cfg.auth.admin_username.clone(),
            admin_password: cfg.auth.admin_password.clone(),
            session_ttl: chrono::Duration::seconds(i64::try_from(cfg.auth.session_ttl_secs)?),
        },
    )?;
    let content = ContentService::new(Arc::new(SeaOrmContentRepository::new(store)));

    Ok(ServerState {
        auth: Arc::new(auth),
        content: Arc::new(content),
        cookie: CookiePolicy::from_config(cfg),
    })
}

pub fn build_app(cfg: &AppConfig, state: ServerState) -> Router {
    let origins = cfg.server.cors_origins.clone().unwrap_or_default();
    routes::build_router(state, routes::build_cors(&origins), &cfg.server.static_dir, cfg.is_production())
}

/// Public entry: prepare storage, bind and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    runtime::ensure_env(&cfg.server.static_dir, &cfg.storage.data_dir).await?;
    let state = build_state(&cfg).await?;
    let app = build_app(&cfg, state);

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(service = "server", event = "listening", %addr, environment = %cfg.environment, "content console listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
