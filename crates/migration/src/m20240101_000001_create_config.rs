//! Create `config` table.
//!
//! Keyed by the digest of `(set, schema, key)`; every column is text.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Config::Table)
                    .if_not_exists()
                    .col(text(Config::Id).primary_key())
                    .col(text(Config::Set).not_null())
                    .col(text(Config::Schema).not_null())
                    .col(text(Config::Key).not_null())
                    .col(text(Config::Value).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Config::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Config { Table, Id, Set, Schema, Key, Value }
