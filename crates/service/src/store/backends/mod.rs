//! `TabularBackend` implementations, one per storage engine.

pub mod seaorm;
pub mod json_file;
pub mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use seaorm::SeaOrmBackend;

use models::config;

/// Rows in a stable `(set, schema, key)` order.
pub(crate) fn sort_rows(rows: &mut [config::Model]) {
    rows.sort_by(|a, b| (&a.set, &a.schema, &a.key).cmp(&(&b.set, &b.schema, &b.key)));
}
