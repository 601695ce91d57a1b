//! User-defined columns and the in-memory column registry.

use crate::codec::{self, FormatError};
use serde::{Deserialize, Serialize};

/// One user-defined note field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Text shown to the user; unrestricted.
    pub display_name: String,
    /// SQLite field name derived from `display_name`.
    pub storage_key: String,
}

impl Column {
    /// Creates a column, deriving its storage key.
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let storage_key = codec::encode(&display_name);
        Self {
            display_name,
            storage_key,
        }
    }

    /// Rebuilds a column from a persisted storage key.
    pub fn from_storage_key(storage_key: impl Into<String>) -> Result<Self, FormatError> {
        let storage_key = storage_key.into();
        let display_name = codec::decode(&storage_key)?;
        Ok(Self {
            display_name,
            storage_key,
        })
    }
}

/// Ordered set of the notebook's user columns, keyed by storage key.
///
/// Mirrors the persisted `note_columns` table; the store keeps both in step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl ColumnRegistry {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn as_slice(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains_key(&self, storage_key: &str) -> bool {
        self.get(storage_key).is_some()
    }

    pub fn get(&self, storage_key: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.storage_key == storage_key)
    }

    /// Storage keys in definition order.
    pub fn storage_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.storage_key.clone())
            .collect()
    }

    /// Appends a column. Callers check for duplicates first.
    pub fn push(&mut self, column: Column) {
        debug_assert!(!self.contains_key(&column.storage_key));
        self.columns.push(column);
    }

    /// Replaces the column stored under `storage_key`, keeping its position.
    ///
    /// Returns `false` when no such column exists.
    pub fn replace(&mut self, storage_key: &str, column: Column) -> bool {
        match self
            .columns
            .iter_mut()
            .find(|current| current.storage_key == storage_key)
        {
            Some(slot) => {
                *slot = column;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, storage_key: &str) -> Option<Column> {
        let index = self
            .columns
            .iter()
            .position(|column| column.storage_key == storage_key)?;
        Some(self.columns.remove(index))
    }
}
