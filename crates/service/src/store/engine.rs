use std::sync::Arc;

use tracing::{debug, instrument};

use common::{ConfigEntry, QueryPattern};
use models::config;

use crate::errors::StoreError;
use super::backend::TabularBackend;
use super::query::adapt_query;
use super::reconcile::reconcile;

/// Configuration store over any [`TabularBackend`].
///
/// Holds no state besides the backend handle; clones share the backend.
pub struct ConfigStore<B: TabularBackend + ?Sized> {
    backend: Arc<B>,
}

impl<B: TabularBackend + ?Sized> Clone for ConfigStore<B> {
    fn clone(&self) -> Self { Self { backend: Arc::clone(&self.backend) } }
}

impl<B: TabularBackend + ?Sized> ConfigStore<B> {
    pub fn new(backend: Arc<B>) -> Self { Self { backend } }

    pub fn backend(&self) -> &Arc<B> { &self.backend }

    pub fn protocol(&self) -> &'static str { self.backend.protocol() }

    pub fn supports_glob_query(&self) -> bool { self.backend.supports_glob_query() }

    fn ensure_ready(&self) -> Result<(), StoreError> {
        if self.backend.is_ready() {
            Ok(())
        } else {
            Err(StoreError::not_initialized(self.backend.name()))
        }
    }

    /// Entries matching any of `patterns`; `*` in a field matches every value.
    #[instrument(skip_all, fields(protocol = self.backend.protocol(), patterns = patterns.len()))]
    pub async fn get(&self, patterns: &[QueryPattern]) -> Result<Vec<ConfigEntry>, StoreError> {
        self.ensure_ready()?;
        if patterns.is_empty() {
            return Ok(Vec::new());
        }
        let filters = adapt_query(patterns);
        let rows = self.backend.find_by_filter(&filters).await?;
        debug!(rows = rows.len(), "config rows found");
        Ok(rows.into_iter().map(ConfigEntry::from).collect())
    }

    /// Upsert live entries and delete entries whose value is empty.
    ///
    /// The whole batch is validated before the backend sees any of it.
    #[instrument(skip_all, fields(protocol = self.backend.protocol(), entries = entries.len()))]
    pub async fn set(&self, entries: &[ConfigEntry]) -> Result<(), StoreError> {
        self.ensure_ready()?;
        for (idx, e) in entries.iter().enumerate() {
            config::validate_scope(&e.set, &e.schema, &e.key)
                .map_err(|err| StoreError::InvalidEntry(format!("entry {idx}: {err}")))?;
        }
        let plan = reconcile(entries);
        if plan.is_empty() {
            return Ok(());
        }
        debug!(upserts = plan.to_upsert.len(), deletes = plan.to_delete.len(), "applying config batch");
        self.backend.apply(&plan).await
    }
}
