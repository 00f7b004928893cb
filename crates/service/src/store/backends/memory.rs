use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use models::config;

use crate::errors::StoreError;
use crate::store::backend::TabularBackend;
use crate::store::query::{matches_any, BackendFilter};
use crate::store::reconcile::Reconciled;

/// Non-persistent table for tests and dry runs.
///
/// Counts every trait operation that reaches it, so callers can assert that
/// nothing was sent.
#[derive(Default)]
pub struct MemoryBackend {
    rows: Mutex<HashMap<String, config::Model>>,
    not_ready: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    /// A backend reporting not ready until [`mark_ready`](Self::mark_ready).
    pub fn uninitialized() -> Self {
        Self { not_ready: AtomicBool::new(true), ..Self::default() }
    }

    pub fn mark_ready(&self) { self.not_ready.store(false, Ordering::SeqCst); }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    pub fn len(&self) -> usize { self.lock().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, config::Model>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self) { self.calls.fetch_add(1, Ordering::SeqCst); }
}

#[async_trait]
impl TabularBackend for MemoryBackend {
    fn protocol(&self) -> &'static str { "memory" }

    fn name(&self) -> &'static str { "MemoryBackend" }

    fn is_ready(&self) -> bool { !self.not_ready.load(Ordering::SeqCst) }

    async fn find_by_filter(&self, filters: &[BackendFilter]) -> Result<Vec<config::Model>, StoreError> {
        self.record_call();
        let mut rows: Vec<config::Model> = self.lock().values().filter(|r| matches_any(filters, r)).cloned().collect();
        super::sort_rows(&mut rows);
        Ok(rows)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        self.record_call();
        let mut rows = self.lock();
        for id in ids { rows.remove(id); }
        Ok(())
    }

    async fn upsert_by_ids(&self, rows: &[config::Model]) -> Result<(), StoreError> {
        self.record_call();
        let mut map = self.lock();
        for r in rows { map.insert(r.id.clone(), r.clone()); }
        Ok(())
    }

    async fn apply(&self, plan: &Reconciled) -> Result<(), StoreError> {
        self.record_call();
        let mut map = self.lock();
        for id in &plan.to_delete { map.remove(id); }
        for r in &plan.to_upsert { map.insert(r.id.clone(), r.clone()); }
        Ok(())
    }
}
