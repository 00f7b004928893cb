use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::debug;

/// Connection options derived from the `[database]` section.
pub fn connect_options(cfg: &configs::DatabaseConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    if cfg.url.contains(":memory:") {
        // Every pooled connection to `sqlite::memory:` is its own database,
        // so the pool must hold exactly one.
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }
    opts
}

pub async fn connect_with_config(cfg: &configs::DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    debug!(max_connections = cfg.max_connections, "connecting to database");
    Database::connect(connect_options(cfg)).await
}
