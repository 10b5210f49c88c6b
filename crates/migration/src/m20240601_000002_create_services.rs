//! Create `services` table.
//! Ids come from SQLite `AUTOINCREMENT`, so a deleted id is never handed out again.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(pk_auto(Services::Id))
                    .col(text(Services::Title).not_null())
                    .col(text(Services::Description).not_null())
                    .col(text(Services::Emphasis).not_null().default(""))
                    .col(integer(Services::OrderIndex).not_null().default(0))
                    .to_owned(),
            )
            .await?;

        // Display order lookups: order_index, then id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_services_order")
                    .table(Services::Table)
                    .col(Services::OrderIndex)
                    .col(Services::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Title,
    Description,
    Emphasis,
    OrderIndex,
}
