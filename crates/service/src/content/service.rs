use std::{collections::BTreeMap, sync::Arc};

use tracing::{error, info, instrument};

use super::domain::{block_map, setting_map, BlockMap, ContentSnapshot, ServiceInput, ServiceRecord, SettingMap};
use super::repository::ContentRepository;
use crate::auth::domain::Authenticated;
use crate::errors::ServiceError;

/// Application service for the content console.
///
/// Reads are public. Every mutation takes an [`Authenticated`] proof, checks
/// its input before any storage access and returns the post-mutation view.
pub struct ContentService<R: ContentRepository> {
    repo: Arc<R>,
}

fn logged<T>(op: &'static str, res: Result<T, ServiceError>) -> Result<T, ServiceError> {
    if let Err(e) = &res {
        if !e.is_validation() {
            error!(event = "storage_error", op, error = %e, "content storage failed");
        }
    }
    res
}

impl<R: ContentRepository> ContentService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Blocks, ordered services and settings, read concurrently.
    pub async fn get_snapshot(&self) -> Result<ContentSnapshot, ServiceError> {
        let read = async {
            let (blocks, services, settings) = tokio::try_join!(
                self.repo.list_blocks(),
                self.repo.list_services(),
                self.repo.list_settings(),
            )?;
            Ok::<_, ServiceError>(ContentSnapshot {
                blocks: block_map(blocks),
                services: services.into_iter().map(ServiceRecord::from).collect(),
                settings: setting_map(settings),
            })
        };
        logged("get_snapshot", read.await)
    }

    #[instrument(skip_all, fields(user = auth.username(), count = updates.len()))]
    pub async fn upsert_blocks(&self, auth: &Authenticated, updates: BTreeMap<String, String>) -> Result<BlockMap, ServiceError> {
        let res = async {
            self.repo.upsert_blocks(&updates).await?;
            Ok::<_, ServiceError>(block_map(self.repo.list_blocks().await?))
        };
        let blocks = logged("upsert_blocks", res.await)?;
        info!(event = "blocks_updated", keys = ?updates.keys().collect::<Vec<_>>(), "content blocks updated");
        Ok(blocks)
    }

    #[instrument(skip_all, fields(user = auth.username(), count = updates.len()))]
    pub async fn upsert_settings(&self, auth: &Authenticated, updates: BTreeMap<String, String>) -> Result<SettingMap, ServiceError> {
        let res = async {
            self.repo.upsert_settings(&updates).await?;
            Ok::<_, ServiceError>(setting_map(self.repo.list_settings().await?))
        };
        let settings = logged("upsert_settings", res.await)?;
        info!(event = "settings_updated", keys = ?updates.keys().collect::<Vec<_>>(), "settings updated");
        Ok(settings)
    }

    #[instrument(skip_all, fields(user = auth.username()))]
    pub async fn create_service(&self, auth: &Authenticated, input: ServiceInput) -> Result<ServiceRecord, ServiceError> {
        let fields = input.validate()?;
        let created = logged("create_service", self.repo.insert_service(&fields).await)?;
        info!(event = "service_created", id = created.id, "service created");
        Ok(created.into())
    }

    /// Replace all mutable fields of `id`. An unknown id changes nothing and
    /// yields `None`.
    #[instrument(skip_all, fields(user = auth.username(), id = id))]
    pub async fn update_service(&self, auth: &Authenticated, id: i32, input: ServiceInput) -> Result<Option<ServiceRecord>, ServiceError> {
        let fields = input.validate()?;
        let updated = logged("update_service", self.repo.update_service(id, &fields).await)?;
        info!(event = "service_updated", id, found = updated.is_some(), "service updated");
        Ok(updated.map(ServiceRecord::from))
    }

    /// Remove `id` if present. Deleting an absent id succeeds.
    #[instrument(skip_all, fields(user = auth.username(), id = id))]
    pub async fn delete_service(&self, auth: &Authenticated, id: i32) -> Result<i32, ServiceError> {
        logged("delete_service", self.repo.delete_service(id).await)?;
        info!(event = "service_deleted", id, "service removed");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::AuthUser;
    use crate::content::repository::SeaOrmContentRepository;
    use crate::test_support::seeded_store;
    use models::store::Store;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    fn admin() -> Authenticated {
        Authenticated::new(AuthUser { username: "admin".into() })
    }

    fn updates(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    async fn service() -> anyhow::Result<(Store, ContentService<SeaOrmContentRepository>)> {
        let store = seeded_store().await?;
        let svc = ContentService::new(Arc::new(SeaOrmContentRepository::new(store.clone())));
        Ok((store, svc))
    }

    fn input(title: &str, description: &str, order_index: Option<i32>) -> ServiceInput {
        ServiceInput { title: title.into(), description: description.into(), emphasis: None, order_index }
    }

    #[tokio::test]
    async fn snapshot_orders_services_by_order_index_then_id() -> anyhow::Result<()> {
        let (store, svc) = service().await?;
        models::service_entry::Entity::delete_many().exec(store.connection()).await?;

        for (id, order_index) in [(10, 3), (11, 1), (12, 2), (13, 1)] {
            models::service_entry::ActiveModel {
                id: Set(id),
                title: Set(format!("svc {id}")),
                description: Set("d".into()),
                emphasis: Set(String::new()),
                order_index: Set(order_index),
            }
            .insert(store.connection())
            .await?;
        }

        let ids: Vec<i32> = svc.get_snapshot().await?.services.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![11, 13, 12, 10]);
        Ok(())
    }

    #[tokio::test]
    async fn snapshot_shapes_seeded_content() -> anyhow::Result<()> {
        let (_, svc) = service().await?;
        let snap = svc.get_snapshot().await?;

        assert_eq!(snap.blocks.len(), models::seed::BLOCKS.len());
        assert_eq!(snap.blocks["hero.title"].value, "Zarvis");
        assert_eq!(snap.blocks["hero.title"].kind, "text");
        assert_eq!(snap.settings["contact.email"], "command@zarvis.global");
        let orders: Vec<i32> = snap.services.iter().map(|s| s.order_index).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn block_upsert_round_trips_and_repeats_cleanly() -> anyhow::Result<()> {
        let (_, svc) = service().await?;
        let batch = updates(&[("hero.title", "Z"), ("new.key", "<b>fresh</b>")]);

        let first = svc.upsert_blocks(&admin(), batch.clone()).await?;
        assert_eq!(first["hero.title"].value, "Z");
        assert_eq!(first["new.key"].value, "<b>fresh</b>");
        assert_eq!(first["new.key"].kind, "text");

        let second = svc.upsert_blocks(&admin(), batch).await?;
        assert_eq!(first.len(), second.len());
        assert_eq!(second, svc.get_snapshot().await?.blocks);
        Ok(())
    }

    #[tokio::test]
    async fn empty_batch_returns_current_view() -> anyhow::Result<()> {
        let (_, svc) = service().await?;
        let settings = svc.upsert_settings(&admin(), BTreeMap::new()).await?;
        assert_eq!(settings.len(), models::seed::SETTINGS.len());
        Ok(())
    }

    #[tokio::test]
    async fn settings_batch_is_atomic_under_storage_fault() -> anyhow::Result<()> {
        let (store, svc) = service().await?;
        store
            .execute(
                "CREATE TRIGGER poison_settings BEFORE INSERT ON settings \
                 WHEN NEW.key = 'zz.poison' BEGIN SELECT RAISE(ABORT, 'injected fault'); END;",
                [],
            )
            .await?;
        let before = svc.get_snapshot().await?.settings;

        let batch = updates(&[("contact.email", "changed@example.com"), ("aa.new", "x"), ("zz.poison", "boom")]);
        let err = svc.upsert_settings(&admin(), batch).await.unwrap_err();
        assert!(!err.is_validation());

        assert_eq!(svc.get_snapshot().await?.settings, before);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_service_never_reaches_storage() -> anyhow::Result<()> {
        let (store, svc) = service().await?;
        let count = models::service_entry::Entity::find().count(store.connection()).await?;

        let err = svc.create_service(&admin(), input("", "desc", None)).await.unwrap_err();
        assert!(err.is_validation());
        let err = svc.update_service(&admin(), 1, input("title", " ", None)).await.unwrap_err();
        assert!(err.is_validation());

        assert_eq!(models::service_entry::Entity::find().count(store.connection()).await?, count);
        Ok(())
    }

    #[tokio::test]
    async fn service_lifecycle() -> anyhow::Result<()> {
        let (_, svc) = service().await?;

        let created = svc.create_service(&admin(), input("First", "Leads the list", Some(0))).await?;
        assert_eq!(created.emphasis, "");
        let snap = svc.get_snapshot().await?;
        assert_eq!(snap.services.first().map(|s| s.id), Some(created.id));

        let updated = svc
            .update_service(&admin(), created.id, input("Renamed", "Now last", Some(99)))
            .await?
            .expect("row exists");
        assert_eq!((updated.title.as_str(), updated.order_index), ("Renamed", 99));
        let snap = svc.get_snapshot().await?;
        assert_eq!(snap.services.last().map(|s| s.id), Some(created.id));

        assert_eq!(svc.delete_service(&admin(), created.id).await?, created.id);
        let snap = svc.get_snapshot().await?;
        assert!(snap.services.iter().all(|s| s.id != created.id));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_ids_are_silent_no_ops() -> anyhow::Result<()> {
        let (_, svc) = service().await?;
        let before = svc.get_snapshot().await?;

        assert_eq!(svc.update_service(&admin(), 999, input("T", "D", None)).await?, None);
        assert_eq!(svc.delete_service(&admin(), 999).await?, 999);

        assert_eq!(svc.get_snapshot().await?, before);
        Ok(())
    }
}
