//! Builds the configured backend and wraps it in a [`ConfigStore`].

use std::sync::Arc;

use tracing::info;

use configs::{AppConfig, BackendKind};

use crate::errors::StoreError;
use crate::store::backends::{JsonFileBackend, MemoryBackend, SeaOrmBackend};
use crate::store::{ConfigStore, TabularBackend};

/// Open the store selected by `[store] backend`, initialized and ready.
pub async fn open_store(cfg: &AppConfig) -> Result<ConfigStore<dyn TabularBackend>, StoreError> {
    let backend: Arc<dyn TabularBackend> = match cfg.store.backend {
        BackendKind::SeaOrm => {
            let b = SeaOrmBackend::new(cfg.database.clone(), cfg.store.synchronize);
            b.initialize().await?;
            Arc::new(b)
        }
        BackendKind::JsonFile => Arc::new(JsonFileBackend::open(&cfg.store.data_file).await?),
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    };
    info!(event = "store_opened", protocol = backend.protocol(), "config store ready");
    Ok(ConfigStore::new(backend))
}
