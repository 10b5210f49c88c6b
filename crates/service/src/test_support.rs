#![cfg(test)]
use configs::DatabaseConfig;
use models::store::Store;

/// Fresh SQLite file under the OS temp dir with schema and default content.
pub async fn seeded_store() -> Result<Store, anyhow::Error> {
    let path = std::env::temp_dir().join(format!("svc_content_{}.sqlite", uuid::Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        ..DatabaseConfig::default()
    };
    let store = Store::open(&cfg).await?;
    store.initialize().await?;
    store.seed_if_empty().await?;
    Ok(store)
}
