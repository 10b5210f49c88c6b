use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use super::temp_store;
use crate::{content_block, seed, service_entry, setting, store::Store};

async fn counts(store: &Store) -> Result<(u64, u64, u64)> {
    let db = store.connection();
    Ok((
        content_block::Entity::find().count(db).await?,
        service_entry::Entity::find().count(db).await?,
        setting::Entity::find().count(db).await?,
    ))
}

#[tokio::test]
async fn initialize_and_seed_twice_matches_once() -> Result<()> {
    let store = temp_store().await?;
    store.initialize().await?;
    assert!(store.seed_if_empty().await?);
    let once = counts(&store).await?;
    assert_eq!(
        once,
        (seed::BLOCKS.len() as u64, seed::SERVICES.len() as u64, seed::SETTINGS.len() as u64)
    );

    store.initialize().await?;
    assert!(!store.seed_if_empty().await?);
    assert_eq!(counts(&store).await?, once);
    Ok(())
}

#[tokio::test]
async fn seeded_blocks_default_to_text_kind() -> Result<()> {
    let store = temp_store().await?;
    store.initialize().await?;
    store.seed_if_empty().await?;

    let hero = content_block::Entity::find_by_id("hero.title".to_string())
        .one(store.connection())
        .await?
        .expect("hero.title seeded");
    assert_eq!(hero.value, "Zarvis");
    assert_eq!(hero.kind, content_block::DEFAULT_KIND);
    Ok(())
}

#[tokio::test]
async fn deleted_service_ids_are_not_reused() -> Result<()> {
    let store = temp_store().await?;
    store.initialize().await?;

    let make = || service_entry::ActiveModel {
        title: Set("t".into()),
        description: Set("d".into()),
        emphasis: Set(String::new()),
        order_index: Set(0),
        ..Default::default()
    };
    let first = make().insert(store.connection()).await?;
    service_entry::Entity::delete_by_id(first.id).exec(store.connection()).await?;
    let second = make().insert(store.connection()).await?;
    assert!(second.id > first.id);
    Ok(())
}

#[tokio::test]
async fn raw_primitives_are_parameterized() -> Result<()> {
    let store = temp_store().await?;
    store.initialize().await?;

    let hostile = "x'); DROP TABLE settings; --";
    let affected = store
        .execute(
            "INSERT INTO settings (key, value) VALUES (?, ?)",
            [hostile.into(), "v".into()],
        )
        .await?;
    assert_eq!(affected, 1);

    let row = store
        .fetch_one("SELECT value FROM settings WHERE key = ?", [hostile.into()])
        .await?
        .expect("row inserted");
    assert_eq!(row.try_get::<String>("", "value")?, "v");

    let rows = store.fetch_all("SELECT key FROM settings", []).await?;
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[tokio::test]
async fn open_fails_when_storage_is_unwritable() {
    let cfg = DatabaseConfig {
        url: "sqlite:///dev/null/zarvis/content.sqlite?mode=rwc".into(),
        ..DatabaseConfig::default()
    };
    assert!(Store::open(&cfg).await.is_err());
}
