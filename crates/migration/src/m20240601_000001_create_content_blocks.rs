//! Create `content_blocks` table.
//! One row per editable text block, keyed by its dotted path.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentBlocks::Table)
                    .if_not_exists()
                    .col(text(ContentBlocks::Key).primary_key())
                    .col(text(ContentBlocks::Value).not_null())
                    .col(text(ContentBlocks::Type).not_null().default("text"))
                    .col(
                        timestamp_with_time_zone(ContentBlocks::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContentBlocks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContentBlocks {
    Table,
    Key,
    Value,
    Type,
    UpdatedAt,
}
