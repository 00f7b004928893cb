use md5::{Digest, Md5};
use serde::Serialize;

/// Canonical form hashed into an identity. Field order is part of the format.
#[derive(Serialize)]
struct Scope<'a> {
    set: &'a str,
    schema: &'a str,
    key: &'a str,
}

/// Stable row identity for `(set, schema, key)`.
///
/// MD5 over the compact JSON object `{"set":..,"schema":..,"key":..}`,
/// rendered as 32 lowercase hex characters. The value never takes part.
/// Hashes the UTF-8 bytes; rows written by the older store only share
/// identities with this one when all three fields are ASCII.
pub fn identity(set: &str, schema: &str, key: &str) -> String {
    // Serializing a struct of three strings cannot fail.
    let canonical = serde_json::to_vec(&Scope { set, schema, key }).unwrap_or_default();
    let digest = Md5::digest(&canonical);
    format!("{digest:x}")
}
