use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_config::Config;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookups filter by set and schema far more often than by key alone
        manager
            .create_index(
                Index::create()
                    .name("idx_config_set_schema")
                    .table(Config::Table)
                    .if_not_exists()
                    .col(Config::Set)
                    .col(Config::Schema)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_config_key")
                    .table(Config::Table)
                    .if_not_exists()
                    .col(Config::Key)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_config_set_schema").table(Config::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_config_key").table(Config::Table).to_owned())
            .await
    }
}
