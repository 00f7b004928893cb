//! Store contract: a pure core (identity, query adaptation, reconciliation)
//! plus the engine that drives a [`TabularBackend`].

pub mod identity;
pub mod query;
pub mod reconcile;
pub mod backend;
pub mod engine;
pub mod backends;

pub use backend::TabularBackend;
pub use engine::ConfigStore;
pub use identity::identity;
pub use query::{adapt_query, BackendFilter};
pub use reconcile::{reconcile, Reconciled};
