use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use models::config;

use crate::errors::StoreError;
use crate::storage::json_map_store::JsonMapStore;
use crate::store::backend::TabularBackend;
use crate::store::query::{matches_any, BackendFilter};
use crate::store::reconcile::Reconciled;

const NAME: &str = "JsonFileBackend";

/// Table kept as a JSON object of `id -> row` in a single file.
pub struct JsonFileBackend {
    path: PathBuf,
    store: OnceCell<JsonMapStore<String, config::Model>>,
}

impl JsonFileBackend {
    /// Unready backend for `path`; call [`initialize`](Self::initialize) before use.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), store: OnceCell::new() }
    }

    /// Create and initialize in one step.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let backend = Self::new(path);
        backend.initialize().await?;
        Ok(backend)
    }

    /// Load the file, creating it when missing. No-op once loaded.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.store
            .get_or_try_init(|| async {
                let store = JsonMapStore::open(self.path.clone())
                    .await
                    .map_err(|e| StoreError::initialize(NAME, e))?;
                let rows = store.len().await;
                info!(path = %self.path.display(), rows, "json config file loaded");
                Ok::<_, StoreError>(store)
            })
            .await?;
        Ok(())
    }

    fn store(&self) -> Result<&JsonMapStore<String, config::Model>, StoreError> {
        self.store.get().ok_or_else(|| StoreError::not_initialized(NAME))
    }
}

fn write_err(e: impl ToString) -> StoreError { StoreError::BackendWrite(e.to_string()) }

#[async_trait]
impl TabularBackend for JsonFileBackend {
    fn protocol(&self) -> &'static str { "json-file" }

    fn name(&self) -> &'static str { NAME }

    fn is_ready(&self) -> bool { self.store.initialized() }

    async fn find_by_filter(&self, filters: &[BackendFilter]) -> Result<Vec<config::Model>, StoreError> {
        let mut rows = self
            .store()?
            .read(|m| m.values().filter(|r| matches_any(filters, r)).cloned().collect::<Vec<_>>())
            .await;
        super::sort_rows(&mut rows);
        Ok(rows)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        self.store()?
            .update_map(|m| ids.iter().for_each(|id| { m.remove(id); }))
            .await
            .map_err(write_err)
    }

    async fn upsert_by_ids(&self, rows: &[config::Model]) -> Result<(), StoreError> {
        self.store()?
            .update_map(|m| rows.iter().for_each(|r| { m.insert(r.id.clone(), r.clone()); }))
            .await
            .map_err(write_err)
    }

    /// One lock and one file write for the whole batch.
    async fn apply(&self, plan: &Reconciled) -> Result<(), StoreError> {
        self.store()?
            .update_map(|m| {
                for id in &plan.to_delete { m.remove(id); }
                for r in &plan.to_upsert { m.insert(r.id.clone(), r.clone()); }
            })
            .await
            .map_err(write_err)
    }
}
