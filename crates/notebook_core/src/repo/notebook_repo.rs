//! Notebook store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Notebook lifecycle (metadata record, base tables).
//! - Dynamic column management over the `notes` table.
//! - Note CRUD with per-column values.
//!
//! # Invariants
//! - Every user column exists both as a `notes` field and as a
//!   `note_columns` row; both change in the same transaction.
//! - The in-memory registry is only updated after the transaction commits.
//! - Field keys are checked against the registry before they are spliced
//!   into SQL, and are always quoted.
//! - Registry keys are loaded as stored; only the decoding listings
//!   (`list_columns_decoded`, `column_name_mapping`) fail on a bad key.
//! - Each call opens its own connection and drops it before returning.
//!
//! # Known limitations
//! - Two stores on the same file do not see each other's column changes
//!   until `refresh_columns`; concurrent writers are not coordinated.

use crate::codec::{self, FormatError};
use crate::config::StoreConfig;
use crate::db::{
    ensure_base_schema, open_notebook_db, DbError, CONTENT_FIELD, ID_FIELD, RESERVED_FIELDS,
};
use crate::model::column::{Column, ColumnRegistry};
use crate::model::note::{FieldValue, NoteFields, NoteId, NoteRecord, NoteSummary};
use log::{debug, error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Column-existence precondition failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A column with this storage key is already defined.
    ColumnExists {
        display_name: String,
        storage_key: String,
    },
    /// No column with this storage key is defined.
    ColumnMissing {
        display_name: String,
        storage_key: String,
    },
    /// A field key passed to a note write is not a user column.
    UnknownField(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnExists {
                display_name,
                storage_key,
            } => write!(f, "column `{display_name}` ({storage_key}) already exists"),
            Self::ColumnMissing {
                display_name,
                storage_key,
            } => write!(f, "column `{display_name}` ({storage_key}) does not exist"),
            Self::UnknownField(key) => write!(f, "`{key}` is not a user column"),
        }
    }
}

impl Error for SchemaError {}

/// Error returned by every store operation.
#[derive(Debug)]
pub enum StoreError {
    Format(FormatError),
    Schema(SchemaError),
    Storage(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<FormatError> for StoreError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<SchemaError> for StoreError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Notebook operations exposed to the UI layer.
///
/// Column arguments are display names; field maps are keyed by storage key.
pub trait NotebookStore {
    /// Ensures base tables exist and records `name` if no title is stored yet.
    ///
    /// Returns `true` when the title row was inserted.
    fn create_notebook(&self, name: &str) -> StoreResult<bool>;
    /// Returns the stored title, or an empty string.
    fn title(&self) -> StoreResult<String>;
    /// Overwrites the stored title.
    fn set_title(&self, name: &str) -> StoreResult<()>;

    fn add_column(&mut self, display_name: &str) -> StoreResult<Column>;
    fn rename_column(
        &mut self,
        old_display_name: &str,
        new_display_name: &str,
    ) -> StoreResult<Column>;
    fn delete_column(&mut self, display_name: &str) -> StoreResult<()>;
    /// User columns in definition order.
    fn columns(&self) -> &[Column];
    /// Storage keys of user columns in definition order.
    fn list_columns(&self) -> Vec<String>;
    /// Display names of user columns, decoded from their storage keys.
    fn list_columns_decoded(&self) -> StoreResult<Vec<String>>;
    /// Storage key -> display name for every user column.
    fn column_name_mapping(&self) -> StoreResult<BTreeMap<String, String>>;

    fn add_note(&self, content: &str, fields: &NoteFields) -> StoreResult<NoteId>;
    /// Returns `false` when no note had this id.
    fn delete_note(&self, id: NoteId) -> StoreResult<bool>;
    /// Returns `false` for an empty update set or a missing note.
    fn edit_note_fields(&self, id: NoteId, updates: &NoteFields) -> StoreResult<bool>;
    /// Returns `false` when no note had this id.
    fn edit_note_content(&self, id: NoteId, content: &str) -> StoreResult<bool>;
    /// Every note without its body, ordered by id.
    fn all_notes(&self) -> StoreResult<Vec<NoteSummary>>;
    fn note(&self, id: NoteId) -> StoreResult<Option<NoteRecord>>;
    /// Returns the note body, or an empty string when the note is absent.
    fn note_content(&self, id: NoteId) -> StoreResult<String>;
}

/// SQLite-backed notebook store bound to one notebook file.
#[derive(Debug)]
pub struct SqliteNotebookStore {
    path: PathBuf,
    config: StoreConfig,
    registry: ColumnRegistry,
}

impl SqliteNotebookStore {
    /// Opens the notebook file at `path`, creating base tables on first use,
    /// and loads the column registry.
    pub fn open(path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_notebook_db(&path, &config)?;
        ensure_base_schema(&conn)?;
        let registry = load_registry(&conn)?;
        info!(
            "event=notebook_open module=repo status=ok columns={}",
            registry.len()
        );
        Ok(Self {
            path,
            config,
            registry,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reloads the registry from `note_columns`.
    pub fn refresh_columns(&mut self) -> StoreResult<()> {
        let conn = self.connect()?;
        self.registry = load_registry(&conn)?;
        Ok(())
    }

    fn connect(&self) -> StoreResult<Connection> {
        Ok(open_notebook_db(&self.path, &self.config)?)
    }

    fn require_known_fields<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a String>,
    ) -> StoreResult<()> {
        for key in keys {
            if !self.registry.contains_key(key) {
                warn!("event=note_write module=repo status=rejected error_code=unknown_field field={key}");
                return Err(SchemaError::UnknownField(key.clone()).into());
            }
        }
        Ok(())
    }

    fn select_list(&self, include_content: bool) -> String {
        let mut fields = vec![ID_FIELD.to_string()];
        if include_content {
            fields.push(CONTENT_FIELD.to_string());
        }
        fields.extend(
            self.registry
                .as_slice()
                .iter()
                .map(|column| quote_identifier(&column.storage_key)),
        );
        fields.join(", ")
    }

    fn read_fields(
        &self,
        row: &Row<'_>,
        first_index: usize,
    ) -> rusqlite::Result<Vec<FieldValue>> {
        self.registry
            .as_slice()
            .iter()
            .enumerate()
            .map(|(offset, column)| {
                Ok::<_, rusqlite::Error>(FieldValue {
                    storage_key: column.storage_key.clone(),
                    value: row.get(first_index + offset)?,
                })
            })
            .collect()
    }
}

impl NotebookStore for SqliteNotebookStore {
    fn create_notebook(&self, name: &str) -> StoreResult<bool> {
        let result = self.connect().and_then(|conn| {
            ensure_base_schema(&conn)?;
            let inserted = conn.execute(
                "INSERT INTO metadata (name)
                 SELECT ?1
                 WHERE NOT EXISTS (SELECT 1 FROM metadata);",
                [name],
            )?;
            Ok(inserted == 1)
        });
        let inserted = logged("notebook_create", result)?;
        info!("event=notebook_create module=repo status=ok inserted={inserted}");
        Ok(inserted)
    }

    fn title(&self) -> StoreResult<String> {
        let result = self.connect().and_then(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM metadata LIMIT 1;")?;
            let mut rows = stmt.query([])?;
            let title = match rows.next()? {
                Some(row) => row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                None => String::new(),
            };
            Ok(title)
        });
        logged("notebook_title", result)
    }

    fn set_title(&self, name: &str) -> StoreResult<()> {
        let result = self.connect().and_then(|conn| {
            conn.execute(
                "UPDATE metadata SET name = ?1 WHERE name IS NOT NULL;",
                [name],
            )?;
            Ok(())
        });
        logged("notebook_set_title", result)?;
        info!("event=notebook_set_title module=repo status=ok");
        Ok(())
    }

    fn add_column(&mut self, display_name: &str) -> StoreResult<Column> {
        let column = Column::new(display_name);
        if self.registry.contains_key(&column.storage_key) {
            warn!(
                "event=column_add module=repo status=rejected error_code=column_exists storage_key={}",
                column.storage_key
            );
            return Err(SchemaError::ColumnExists {
                display_name: column.display_name,
                storage_key: column.storage_key,
            }
            .into());
        }

        let result = self.connect().and_then(|mut conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(&format!(
                "ALTER TABLE notes ADD COLUMN {} TEXT DEFAULT NULL;",
                quote_identifier(&column.storage_key)
            ))?;
            tx.execute(
                "INSERT INTO note_columns (storage_key, display_name, position)
                 SELECT ?1, ?2, COALESCE(MAX(position), -1) + 1 FROM note_columns;",
                params![column.storage_key, column.display_name],
            )?;
            tx.commit()?;
            Ok(())
        });
        logged("column_add", result)?;

        self.registry.push(column.clone());
        info!(
            "event=column_add module=repo status=ok storage_key={}",
            column.storage_key
        );
        Ok(column)
    }

    fn rename_column(
        &mut self,
        old_display_name: &str,
        new_display_name: &str,
    ) -> StoreResult<Column> {
        let old_key = codec::encode(old_display_name);
        let renamed = Column::new(new_display_name);
        if !self.registry.contains_key(&old_key) {
            warn!(
                "event=column_rename module=repo status=rejected error_code=column_missing storage_key={old_key}"
            );
            return Err(SchemaError::ColumnMissing {
                display_name: old_display_name.to_string(),
                storage_key: old_key,
            }
            .into());
        }
        if self.registry.contains_key(&renamed.storage_key) {
            warn!(
                "event=column_rename module=repo status=rejected error_code=column_exists storage_key={}",
                renamed.storage_key
            );
            return Err(SchemaError::ColumnExists {
                display_name: renamed.display_name,
                storage_key: renamed.storage_key,
            }
            .into());
        }

        let result = self.connect().and_then(|mut conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(&format!(
                "ALTER TABLE notes RENAME COLUMN {} TO {};",
                quote_identifier(&old_key),
                quote_identifier(&renamed.storage_key)
            ))?;
            tx.execute(
                "UPDATE note_columns
                 SET storage_key = ?1, display_name = ?2
                 WHERE storage_key = ?3;",
                params![renamed.storage_key, renamed.display_name, old_key],
            )?;
            tx.commit()?;
            Ok(())
        });
        logged("column_rename", result)?;

        self.registry.replace(&old_key, renamed.clone());
        info!(
            "event=column_rename module=repo status=ok from={} to={}",
            old_key, renamed.storage_key
        );
        Ok(renamed)
    }

    fn delete_column(&mut self, display_name: &str) -> StoreResult<()> {
        let storage_key = codec::encode(display_name);
        if !self.registry.contains_key(&storage_key) {
            warn!(
                "event=column_delete module=repo status=rejected error_code=column_missing storage_key={storage_key}"
            );
            return Err(SchemaError::ColumnMissing {
                display_name: display_name.to_string(),
                storage_key,
            }
            .into());
        }

        let result = self.connect().and_then(|mut conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(&format!(
                "ALTER TABLE notes DROP COLUMN {};",
                quote_identifier(&storage_key)
            ))?;
            tx.execute(
                "DELETE FROM note_columns WHERE storage_key = ?1;",
                [storage_key.as_str()],
            )?;
            tx.commit()?;
            Ok(())
        });
        logged("column_delete", result)?;

        self.registry.remove(&storage_key);
        info!("event=column_delete module=repo status=ok storage_key={storage_key}");
        Ok(())
    }

    fn columns(&self) -> &[Column] {
        self.registry.as_slice()
    }

    fn list_columns(&self) -> Vec<String> {
        self.registry.storage_keys()
    }

    fn list_columns_decoded(&self) -> StoreResult<Vec<String>> {
        self.registry
            .as_slice()
            .iter()
            .map(|column| codec::decode(&column.storage_key).map_err(StoreError::from))
            .collect()
    }

    fn column_name_mapping(&self) -> StoreResult<BTreeMap<String, String>> {
        self.registry
            .as_slice()
            .iter()
            .map(|column| {
                let display_name = codec::decode(&column.storage_key)?;
                Ok::<_, StoreError>((column.storage_key.clone(), display_name))
            })
            .collect()
    }

    fn add_note(&self, content: &str, fields: &NoteFields) -> StoreResult<NoteId> {
        self.require_known_fields(fields.keys())?;

        let mut names = vec![CONTENT_FIELD.to_string()];
        let mut values = vec![Value::Text(content.to_string())];
        for (key, value) in fields {
            names.push(quote_identifier(key));
            values.push(to_sql_value(value));
        }
        let sql = format!(
            "INSERT INTO notes ({}) VALUES ({});",
            names.join(", "),
            placeholders(1, values.len())
        );

        let result = self.connect().and_then(|conn| {
            conn.execute(&sql, params_from_iter(values))?;
            Ok(conn.last_insert_rowid())
        });
        let id = logged("note_add", result)?;
        info!(
            "event=note_add module=repo status=ok note_id={id} fields={}",
            fields.len()
        );
        Ok(id)
    }

    fn delete_note(&self, id: NoteId) -> StoreResult<bool> {
        let result = self.connect().and_then(|conn| {
            let changed = conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
            Ok(changed > 0)
        });
        let deleted = logged("note_delete", result)?;
        if deleted {
            info!("event=note_delete module=repo status=ok note_id={id}");
        } else {
            debug!("event=note_delete module=repo status=noop note_id={id}");
        }
        Ok(deleted)
    }

    fn edit_note_fields(&self, id: NoteId, updates: &NoteFields) -> StoreResult<bool> {
        if updates.is_empty() {
            warn!("event=note_edit_fields module=repo status=noop note_id={id} reason=empty_updates");
            return Ok(false);
        }
        self.require_known_fields(updates.keys())?;

        let assignments = updates
            .keys()
            .enumerate()
            .map(|(index, key)| format!("{} = ?{}", quote_identifier(key), index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE notes SET {assignments} WHERE id = ?{};",
            updates.len() + 1
        );
        let mut values: Vec<Value> = updates.values().map(to_sql_value).collect();
        values.push(Value::Integer(id));

        let result = self.connect().and_then(|conn| {
            let changed = conn.execute(&sql, params_from_iter(values))?;
            Ok(changed > 0)
        });
        let changed = logged("note_edit_fields", result)?;
        info!(
            "event=note_edit_fields module=repo status=ok note_id={id} fields={} changed={changed}",
            updates.len()
        );
        Ok(changed)
    }

    fn edit_note_content(&self, id: NoteId, content: &str) -> StoreResult<bool> {
        let result = self.connect().and_then(|conn| {
            let changed = conn.execute(
                "UPDATE notes SET content = ?1 WHERE id = ?2;",
                params![content, id],
            )?;
            Ok(changed > 0)
        });
        let changed = logged("note_edit_content", result)?;
        info!("event=note_edit_content module=repo status=ok note_id={id} changed={changed}");
        Ok(changed)
    }

    fn all_notes(&self) -> StoreResult<Vec<NoteSummary>> {
        let sql = format!("SELECT {} FROM notes ORDER BY id ASC;", self.select_list(false));
        let result = self.connect().and_then(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([])?;
            let mut notes = Vec::new();
            while let Some(row) = rows.next()? {
                notes.push(NoteSummary {
                    id: row.get(0)?,
                    fields: self.read_fields(row, 1)?,
                });
            }
            Ok(notes)
        });
        let notes = logged("note_list", result)?;
        debug!("event=note_list module=repo status=ok count={}", notes.len());
        Ok(notes)
    }

    fn note(&self, id: NoteId) -> StoreResult<Option<NoteRecord>> {
        let sql = format!("SELECT {} FROM notes WHERE id = ?1;", self.select_list(true));
        let result = self.connect().and_then(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([id])?;
            let note = match rows.next()? {
                Some(row) => Some(NoteRecord {
                    id: row.get(0)?,
                    content: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    fields: self.read_fields(row, 2)?,
                }),
                None => None,
            };
            Ok(note)
        });
        let note = logged("note_get", result)?;
        if note.is_none() {
            debug!("event=note_get module=repo status=not_found note_id={id}");
        }
        Ok(note)
    }

    fn note_content(&self, id: NoteId) -> StoreResult<String> {
        let result = self.connect().and_then(|conn| {
            let mut stmt = conn.prepare("SELECT content FROM notes WHERE id = ?1;")?;
            let mut rows = stmt.query([id])?;
            let content = match rows.next()? {
                Some(row) => row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                None => String::new(),
            };
            Ok(content)
        });
        logged("note_content", result)
    }
}

/// Quotes a SQLite identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn load_registry(conn: &Connection) -> StoreResult<ColumnRegistry> {
    let mut stmt = conn.prepare(
        "SELECT storage_key, display_name
         FROM note_columns
         ORDER BY position ASC, storage_key ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let storage_key: String = row.get("storage_key")?;
        let display_name: String = row.get("display_name")?;
        if RESERVED_FIELDS.contains(&storage_key.as_str()) {
            return Err(SchemaError::UnknownField(storage_key).into());
        }
        // Undecodable keys stay loaded; only the decoding listings fail on them.
        if !codec::is_encoded(&storage_key) {
            warn!(
                "event=registry_load module=repo status=invalid_key storage_key={storage_key}"
            );
        }
        columns.push(Column {
            display_name,
            storage_key,
        });
    }
    Ok(ColumnRegistry::new(columns))
}

fn to_sql_value(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn logged<T>(event: &'static str, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(err) = &result {
        error!("event={event} module=repo status=error error={err}");
    }
    result
}
