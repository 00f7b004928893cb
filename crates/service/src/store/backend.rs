use async_trait::async_trait;

use models::config;

use crate::errors::StoreError;
use super::query::BackendFilter;
use super::reconcile::Reconciled;

/// Tabular persistence behind a [`ConfigStore`](super::ConfigStore).
/// Implementations can be database-backed, file-backed or in-memory.
#[async_trait]
pub trait TabularBackend: Send + Sync {
    /// Engine name, e.g. `postgres` or `json-file`.
    fn protocol(&self) -> &'static str;

    /// Implementation name used in error messages.
    fn name(&self) -> &'static str;

    fn is_ready(&self) -> bool;

    /// Whether glob patterns inside a field value are understood.
    fn supports_glob_query(&self) -> bool { false }

    /// Rows matching the OR of `filters`. An empty slice matches nothing.
    async fn find_by_filter(&self, filters: &[BackendFilter]) -> Result<Vec<config::Model>, StoreError>;

    /// Remove rows by primary key. Unknown ids are ignored.
    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), StoreError>;

    /// Insert rows, or replace every non-key column of rows with the same id.
    async fn upsert_by_ids(&self, rows: &[config::Model]) -> Result<(), StoreError>;

    /// Apply a reconciled batch: deletions first, then upserts.
    async fn apply(&self, plan: &Reconciled) -> Result<(), StoreError> {
        if !plan.to_delete.is_empty() {
            self.delete_by_ids(&plan.to_delete).await?;
        }
        if !plan.to_upsert.is_empty() {
            self.upsert_by_ids(&plan.to_upsert).await?;
        }
        Ok(())
    }
}
