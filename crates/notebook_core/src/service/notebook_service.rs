//! Notebook use-case service.
//!
//! # Responsibility
//! - Seed a freshly created notebook file with its default title and column.
//! - Load everything the notebook table view shows in one snapshot.
//! - Hand note bodies to the markdown renderer.
//!
//! # Invariants
//! - Snapshots expose display names decoded from storage keys; a key that
//!   does not decode fails the snapshot instead of showing a raw identifier.

use crate::config::{DEFAULT_COLUMN_NAME, DEFAULT_NOTEBOOK_TITLE};
use crate::model::column::Column;
use crate::model::note::{NoteId, NoteSummary};
use crate::render::MarkdownRenderer;
use crate::repo::notebook_repo::{NotebookStore, StoreResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Everything the table view needs to draw a notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookSnapshot {
    pub title: String,
    /// Column headers in definition order.
    pub columns: Vec<Column>,
    pub notes: Vec<NoteSummary>,
}

/// Service facade over a notebook store.
pub struct NotebookService<S: NotebookStore> {
    store: S,
}

impl<S: NotebookStore> NotebookService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Prepares a new notebook file: default title plus one default column.
    ///
    /// Safe to repeat. The title is only written when no metadata record
    /// exists yet, and the column is only added while the notebook has none.
    pub fn initialize_new_notebook(&mut self) -> StoreResult<()> {
        let created = self.store.create_notebook(DEFAULT_NOTEBOOK_TITLE)?;
        if self.store.columns().is_empty() {
            self.store.add_column(DEFAULT_COLUMN_NAME)?;
        }
        info!("event=notebook_initialize module=service status=ok created={created}");
        Ok(())
    }

    /// Loads title, decoded column headers and note rows.
    pub fn snapshot(&self) -> StoreResult<NotebookSnapshot> {
        let keys = self.store.list_columns();
        let names = self.store.list_columns_decoded()?;
        let columns = keys
            .into_iter()
            .zip(names)
            .map(|(storage_key, display_name)| Column {
                display_name,
                storage_key,
            })
            .collect();

        Ok(NotebookSnapshot {
            title: self.store.title()?,
            columns,
            notes: self.store.all_notes()?,
        })
    }

    /// Renders one note body; a missing note renders as empty content.
    pub fn render_note(
        &self,
        id: NoteId,
        renderer: &dyn MarkdownRenderer,
    ) -> StoreResult<String> {
        let content = self.store.note_content(id)?;
        Ok(renderer.render_markdown(&content))
    }
}
