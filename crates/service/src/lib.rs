//! Configuration store: identity derivation, wildcard query adaptation and
//! batch reconciliation, written once against the `TabularBackend` trait and
//! served by SeaORM, JSON-file and in-memory backends.

pub mod errors;
pub mod store;
pub mod storage;
pub mod bootstrap;
#[cfg(test)]
pub mod test_support;

pub use errors::StoreError;
pub use store::{ConfigStore, TabularBackend};
