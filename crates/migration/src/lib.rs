//! Migrator for the configuration store schema.
//! Indexes are applied after the table they cover.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_config;
mod m20240101_000002_add_config_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_config::Migration),
            Box::new(m20240101_000002_add_config_indexes::Migration),
        ]
    }
}
