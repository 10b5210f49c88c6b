/// Schema creation, seeding and the raw statement primitives
pub mod store_tests;

use configs::DatabaseConfig;

use crate::store::Store;

/// Fresh file-backed SQLite store under the OS temp dir.
pub(crate) async fn temp_store() -> anyhow::Result<Store> {
    let path = std::env::temp_dir().join(format!("zarvis_models_{}.sqlite", uuid::Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        ..DatabaseConfig::default()
    };
    Store::open(&cfg).await
}
