#![cfg(test)]
use crate::store::backends::SeaOrmBackend;

pub fn sqlite_config() -> configs::DatabaseConfig {
    configs::DatabaseConfig {
        url: "sqlite::memory:".into(),
        connect_timeout_secs: 10,
        acquire_timeout_secs: 10,
        ..Default::default()
    }
}

/// Fresh migrated in-memory SQLite database per call.
pub async fn sqlite_backend() -> Result<SeaOrmBackend, anyhow::Error> {
    let backend = SeaOrmBackend::new(sqlite_config(), true);
    backend.initialize().await?;
    Ok(backend)
}
