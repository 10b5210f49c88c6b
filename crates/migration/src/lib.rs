//! Migrator creating the three content tables.
//! Every migration uses `IF NOT EXISTS`, so running `up` against a store that
//! predates the bookkeeping table is still safe.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_content_blocks;
mod m20240601_000002_create_services;
mod m20240601_000003_create_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_content_blocks::Migration),
            Box::new(m20240601_000002_create_services::Migration),
            Box::new(m20240601_000003_create_settings::Migration),
        ]
    }
}
