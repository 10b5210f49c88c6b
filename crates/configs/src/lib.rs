use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_format: default_log_format(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Browser origins allowed to send credentialed requests. `None` picks
    /// the environment default.
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4000,
            worker_threads: Some(4),
            static_dir: default_static_dir(),
            cors_origins: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            session_file: default_session_file(),
        }
    }
}

impl StorageConfig {
    pub fn database_path(&self) -> String {
        join_path(&self.data_dir, &self.database_file)
    }

    pub fn session_path(&self) -> String {
        join_path(&self.data_dir, &self.session_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Left empty to derive `sqlite://<data_dir>/<database_file>?mode=rwc`.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin")]
    pub admin_username: String,
    #[serde(default = "default_admin")]
    pub admin_password: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin(),
            admin_password: default_admin(),
            session_ttl_secs: default_session_ttl(),
            cookie_name: default_cookie_name(),
        }
    }
}

impl AuthConfig {
    /// True while the shipped `admin`/`admin` pair is still in use.
    pub fn uses_default_credentials(&self) -> bool {
        self.admin_username == default_admin() && self.admin_password == default_admin()
    }
}

fn default_environment() -> String { "development".into() }
fn default_log_format() -> String { "compact".into() }
fn default_static_dir() -> String { "public".into() }
fn default_data_dir() -> String { "data".into() }
fn default_database_file() -> String { "zarvis.sqlite".into() }
fn default_session_file() -> String { "sessions.json".into() }
fn default_max_connections() -> u32 { 5 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_admin() -> String { "admin".into() }
fn default_session_ttl() -> u64 { 8 * 60 * 60 }
fn default_cookie_name() -> String { "zarvis.sid".into() }

/// Upper bound for `auth.session_ttl_secs` (30 days).
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

const DEV_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

fn join_path(dir: &str, file: &str) -> String {
    std::path::Path::new(dir).join(file).to_string_lossy().into_owned()
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` when present (defaults otherwise), apply process
    /// environment overrides, then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override file values with environment variables looked up through `get`.
    pub fn apply_env<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| get(k)).filter(|v| !v.trim().is_empty());

        if let Some(v) = first(&["ENVIRONMENT", "NODE_ENV"]) { self.environment = v; }
        if let Some(v) = first(&["LOG_FORMAT"]) { self.log_format = v; }
        if let Some(v) = first(&["SERVER_HOST"]) { self.server.host = v; }
        if let Some(p) = first(&["SERVER_PORT", "PORT"]).and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = p;
        }
        if let Some(w) = first(&["TOKIO_WORKER_THREADS"]).and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(v) = first(&["STATIC_DIR"]) { self.server.static_dir = v; }
        if let Some(v) = first(&["DATA_DIR"]) { self.storage.data_dir = v; }
        if let Some(v) = first(&["DATABASE_FILE"]) { self.storage.database_file = v; }
        if let Some(v) = first(&["SESSION_FILE"]) { self.storage.session_file = v; }
        if let Some(v) = first(&["DATABASE_URL"]) { self.database.url = v; }
        if let Some(v) = first(&["ADMIN_USERNAME"]) { self.auth.admin_username = v; }
        if let Some(v) = first(&["ADMIN_PASSWORD"]) { self.auth.admin_password = v; }
        if let Some(t) = first(&["SESSION_TTL_SECS"]).and_then(|v| v.parse::<u64>().ok()) {
            self.auth.session_ttl_secs = t;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.environment = self.environment.trim().to_ascii_lowercase();
        self.server.normalize(self.is_production())?;
        self.database.normalize_from_storage(&self.storage);
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl ServerConfig {
    fn normalize(&mut self, production: bool) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        if self.cors_origins.is_none() {
            let origins = if production {
                Vec::new()
            } else {
                DEV_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
            };
            self.cors_origins = Some(origins);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_storage(&mut self, storage: &StorageConfig) {
        if self.url.trim().is_empty() {
            self.url = format!("sqlite://{}?mode=rwc", storage.database_path());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty"));
        }
        if !self.url.to_lowercase().starts_with("sqlite:") {
            return Err(anyhow!("database.url must start with sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.admin_username.trim().is_empty() || self.admin_password.is_empty() {
            return Err(anyhow!("auth.admin_username and auth.admin_password are required"));
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(anyhow!("auth.session_ttl_secs must be within 1..={MAX_SESSION_TTL_SECS}"));
        }
        if self.cookie_name.trim().is_empty() {
            return Err(anyhow!("auth.cookie_name is required"));
        }
        Ok(())
    }
}
