//! Storage helpers for file-backed backends.

pub mod json_map_store;
