//! `config` table: one row per `(set, schema, key)`.
//!
//! `id` is derived from the scoping triple by the store and is the only key;
//! writes always replace the whole row.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::{ConfigEntry, WILDCARD};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub set: String,
    pub schema: String,
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation { fn def(&self) -> RelationDef { panic!("no relations") } }

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn from_entry(id: String, entry: &ConfigEntry) -> Self {
        Self {
            id,
            set: entry.set.clone(),
            schema: entry.schema.clone(),
            key: entry.key.clone(),
            value: entry.value.clone(),
        }
    }
}

impl From<Model> for ConfigEntry {
    fn from(m: Model) -> Self {
        ConfigEntry { set: m.set, schema: m.schema, key: m.key, value: m.value }
    }
}

/// Scoping fields must be non-empty literals before they reach storage.
pub fn validate_scope(set: &str, schema: &str, key: &str) -> Result<(), errors::ModelError> {
    for (name, v) in [("set", set), ("schema", schema), ("key", key)] {
        if v.is_empty() {
            return Err(errors::ModelError::Validation(format!("{name} must not be empty")));
        }
        if v == WILDCARD {
            return Err(errors::ModelError::Validation(format!("{name} must not be the wildcard token")));
        }
    }
    Ok(())
}
