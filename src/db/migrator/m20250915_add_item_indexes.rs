use sea_orm_migration::prelude::*;

use crate::entities::items;
use crate::entities::prelude::Items;

#[derive(DeriveMigrationName)]
pub struct Migration;

// The sweep scans by status and every listing sorts by uploaded_at, so
// both columns get an index.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_items_status")
                    .table(Items)
                    .col(items::Column::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_items_uploaded_at")
                    .table(Items)
                    .col(items::Column::UploadedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_items_uploaded_at").table(Items).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_items_status").table(Items).to_owned())
            .await?;

        Ok(())
    }
}
