use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use models::{content_block, service_entry, setting, store::Store};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::warn;

use super::domain::ServiceFields;
use crate::errors::ServiceError;

/// Data access for the three content tables.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Blocks ordered by key.
    async fn list_blocks(&self) -> Result<Vec<content_block::Model>, ServiceError>;
    /// Services ordered by `order_index`, ties by `id`.
    async fn list_services(&self) -> Result<Vec<service_entry::Model>, ServiceError>;
    /// Settings ordered by key.
    async fn list_settings(&self) -> Result<Vec<setting::Model>, ServiceError>;
    /// Apply every pair or none.
    async fn upsert_blocks(&self, updates: &BTreeMap<String, String>) -> Result<(), ServiceError>;
    /// Apply every pair or none.
    async fn upsert_settings(&self, updates: &BTreeMap<String, String>) -> Result<(), ServiceError>;
    async fn insert_service(&self, fields: &ServiceFields) -> Result<service_entry::Model, ServiceError>;
    /// Replace the mutable fields of `id` and re-read it; `None` when absent.
    async fn update_service(&self, id: i32, fields: &ServiceFields) -> Result<Option<service_entry::Model>, ServiceError>;
    async fn delete_service(&self, id: i32) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository over the shared [`Store`].
#[derive(Clone)]
pub struct SeaOrmContentRepository {
    store: Store,
}

impl SeaOrmContentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

async fn upsert_block(txn: &DatabaseTransaction, key: &str, value: &str) -> Result<(), DbErr> {
    let row = content_block::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        kind: Set(content_block::DEFAULT_KIND.to_string()),
        updated_at: Set(Utc::now()),
    };
    content_block::Entity::insert(row)
        .on_conflict(
            OnConflict::column(content_block::Column::Key)
                .update_columns([content_block::Column::Value, content_block::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

async fn upsert_setting(txn: &DatabaseTransaction, key: &str, value: &str) -> Result<(), DbErr> {
    let row = setting::ActiveModel { key: Set(key.to_string()), value: Set(value.to_string()) };
    setting::Entity::insert(row)
        .on_conflict(
            OnConflict::column(setting::Column::Key)
                .update_column(setting::Column::Value)
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

/// Key/value tables written through batch upserts.
#[derive(Clone, Copy, Debug)]
enum KeyedTable {
    Blocks,
    Settings,
}

impl KeyedTable {
    fn name(self) -> &'static str {
        match self {
            KeyedTable::Blocks => "content_blocks",
            KeyedTable::Settings => "settings",
        }
    }

    async fn upsert(self, txn: &DatabaseTransaction, key: &str, value: &str) -> Result<(), DbErr> {
        match self {
            KeyedTable::Blocks => upsert_block(txn, key, value).await,
            KeyedTable::Settings => upsert_setting(txn, key, value).await,
        }
    }
}

impl SeaOrmContentRepository {
    /// Apply every pair inside one transaction; the first failure rolls the
    /// whole batch back.
    async fn upsert_batch(&self, table: KeyedTable, updates: &BTreeMap<String, String>) -> Result<(), ServiceError> {
        let txn = self.store.begin().await?;
        for (key, value) in updates {
            if let Err(e) = table.upsert(&txn, key, value).await {
                if let Err(rb) = txn.rollback().await {
                    warn!(event = "rollback_failed", table = table.name(), error = %rb, "batch rollback failed");
                }
                return Err(e.into());
            }
        }
        txn.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for SeaOrmContentRepository {
    async fn list_blocks(&self) -> Result<Vec<content_block::Model>, ServiceError> {
        Ok(content_block::Entity::find()
            .order_by_asc(content_block::Column::Key)
            .all(self.store.connection())
            .await?)
    }

    async fn list_services(&self) -> Result<Vec<service_entry::Model>, ServiceError> {
        Ok(service_entry::Entity::find()
            .order_by_asc(service_entry::Column::OrderIndex)
            .order_by_asc(service_entry::Column::Id)
            .all(self.store.connection())
            .await?)
    }

    async fn list_settings(&self) -> Result<Vec<setting::Model>, ServiceError> {
        Ok(setting::Entity::find()
            .order_by_asc(setting::Column::Key)
            .all(self.store.connection())
            .await?)
    }

    async fn upsert_blocks(&self, updates: &BTreeMap<String, String>) -> Result<(), ServiceError> {
        self.upsert_batch(KeyedTable::Blocks, updates).await
    }

    async fn upsert_settings(&self, updates: &BTreeMap<String, String>) -> Result<(), ServiceError> {
        self.upsert_batch(KeyedTable::Settings, updates).await
    }

    async fn insert_service(&self, fields: &ServiceFields) -> Result<service_entry::Model, ServiceError> {
        let row = service_entry::ActiveModel {
            title: Set(fields.title.clone()),
            description: Set(fields.description.clone()),
            emphasis: Set(fields.emphasis.clone()),
            order_index: Set(fields.order_index),
            ..Default::default()
        };
        Ok(row.insert(self.store.connection()).await?)
    }

    async fn update_service(&self, id: i32, fields: &ServiceFields) -> Result<Option<service_entry::Model>, ServiceError> {
        let db = self.store.connection();
        service_entry::Entity::update_many()
            .col_expr(service_entry::Column::Title, Expr::value(fields.title.clone()))
            .col_expr(service_entry::Column::Description, Expr::value(fields.description.clone()))
            .col_expr(service_entry::Column::Emphasis, Expr::value(fields.emphasis.clone()))
            .col_expr(service_entry::Column::OrderIndex, Expr::value(fields.order_index))
            .filter(service_entry::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(service_entry::Entity::find_by_id(id).one(db).await?)
    }

    async fn delete_service(&self, id: i32) -> Result<(), ServiceError> {
        service_entry::Entity::delete_by_id(id).exec(self.store.connection()).await?;
        Ok(())
    }
}
