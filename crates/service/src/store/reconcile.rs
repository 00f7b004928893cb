use std::collections::HashMap;

use common::ConfigEntry;
use models::config;

use super::identity::identity;

/// Backend work for one `set` batch. The two lists never share an id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub to_upsert: Vec<config::Model>,
    pub to_delete: Vec<String>,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.to_upsert.is_empty() && self.to_delete.is_empty()
    }
}

/// Split a batch into deletions (empty value) and full-row upserts.
///
/// When an identity occurs several times, its last occurrence in input order
/// decides, whether that is a tombstone or a live value. Output keeps the
/// input order of each winning occurrence.
pub fn reconcile(entries: &[ConfigEntry]) -> Reconciled {
    let ids: Vec<String> = entries.iter().map(|e| identity(&e.set, &e.schema, &e.key)).collect();

    let mut last: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
    for (idx, id) in ids.iter().enumerate() {
        last.insert(id.as_str(), idx);
    }

    let mut out = Reconciled::default();
    for (idx, (entry, id)) in entries.iter().zip(&ids).enumerate() {
        if last.get(id.as_str()) != Some(&idx) {
            continue;
        }
        if entry.is_tombstone() {
            out.to_delete.push(id.clone());
        } else {
            out.to_upsert.push(config::Model::from_entry(id.clone(), entry));
        }
    }
    out
}
