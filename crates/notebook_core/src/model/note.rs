//! Note read models.
//!
//! Field values are addressed by storage key; the UI maps keys to display
//! names through the column registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Row id assigned by SQLite on insert.
pub type NoteId = i64;

/// Field values keyed by storage key, used for inserts and edits.
///
/// `None` writes SQL `NULL`.
pub type NoteFields = BTreeMap<String, Option<String>>;

/// Value of one user column on one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub storage_key: String,
    pub value: Option<String>,
}

/// Note without its body, as listed in the notebook table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: NoteId,
    /// One entry per current column, in definition order.
    pub fields: Vec<FieldValue>,
}

/// Full note including its markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub content: String,
    /// One entry per current column, in definition order.
    pub fields: Vec<FieldValue>,
}

impl NoteSummary {
    /// Value stored under `storage_key`; `None` for null or unknown keys.
    pub fn field(&self, storage_key: &str) -> Option<&str> {
        lookup(&self.fields, storage_key)
    }

    pub fn has_field(&self, storage_key: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.storage_key == storage_key)
    }
}

impl NoteRecord {
    /// Value stored under `storage_key`; `None` for null or unknown keys.
    pub fn field(&self, storage_key: &str) -> Option<&str> {
        lookup(&self.fields, storage_key)
    }

    pub fn has_field(&self, storage_key: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.storage_key == storage_key)
    }
}

fn lookup<'a>(fields: &'a [FieldValue], storage_key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|field| field.storage_key == storage_key)
        .and_then(|field| field.value.as_deref())
}
