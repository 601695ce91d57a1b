use notebook_core::config::{DEFAULT_COLUMN_NAME, DEFAULT_NOTEBOOK_TITLE};
use notebook_core::{
    notebook_file_path, EscapedTextRenderer, MarkdownRenderer, NoteFields, NotebookService,
    NotebookStore, SqliteNotebookStore, StoreConfig,
};
use tempfile::TempDir;

fn new_service() -> (TempDir, NotebookService<SqliteNotebookStore>) {
    let dir = tempfile::tempdir().unwrap();
    let path = notebook_file_path(dir.path(), "NewNotebook");
    let store = SqliteNotebookStore::open(path, StoreConfig::default()).unwrap();
    (dir, NotebookService::new(store))
}

struct UppercaseRenderer;

impl MarkdownRenderer for UppercaseRenderer {
    fn render_markdown(&self, text: &str) -> String {
        format!("<p>{}</p>", text.to_uppercase())
    }
}

#[test]
fn initialize_new_notebook_sets_default_title_and_column() {
    let (_dir, mut service) = new_service();
    service.initialize_new_notebook().unwrap();

    let snapshot = service.snapshot().unwrap();
    assert_eq!(snapshot.title, DEFAULT_NOTEBOOK_TITLE);
    assert_eq!(snapshot.columns.len(), 1);
    assert_eq!(snapshot.columns[0].display_name, DEFAULT_COLUMN_NAME);
    assert!(snapshot.notes.is_empty());
}

#[test]
fn initialize_new_notebook_is_repeatable() {
    let (_dir, mut service) = new_service();
    service.initialize_new_notebook().unwrap();
    service.initialize_new_notebook().unwrap();

    assert_eq!(service.store().list_columns().len(), 1);
    assert_eq!(service.store().title().unwrap(), DEFAULT_NOTEBOOK_TITLE);
}

#[test]
fn initialize_new_notebook_keeps_existing_title_and_columns() {
    let (_dir, mut service) = new_service();
    service.initialize_new_notebook().unwrap();
    service.store().set_title("Groceries").unwrap();
    service.store_mut().rename_column(DEFAULT_COLUMN_NAME, "Aisle").unwrap();

    service.initialize_new_notebook().unwrap();

    assert_eq!(service.store().title().unwrap(), "Groceries");
    assert_eq!(service.store().list_columns_decoded().unwrap(), vec!["Aisle"]);
}

#[test]
fn snapshot_reflects_column_and_note_changes() {
    let (_dir, mut service) = new_service();
    service.initialize_new_notebook().unwrap();
    let store = service.store_mut();
    store.rename_column(DEFAULT_COLUMN_NAME, "Where?").unwrap();
    let key = store.add_column("When").unwrap().storage_key;

    let mut fields = NoteFields::new();
    fields.insert(key.clone(), Some("tomorrow".to_string()));
    store.add_note("Pack bags", &fields).unwrap();
    store.set_title("Trip Plans").unwrap();

    let snapshot = service.snapshot().unwrap();
    assert_eq!(snapshot.title, "Trip Plans");
    assert_eq!(
        snapshot
            .columns
            .iter()
            .map(|column| column.display_name.as_str())
            .collect::<Vec<_>>(),
        vec!["Where?", "When"]
    );
    assert_eq!(snapshot.notes.len(), 1);
    assert_eq!(snapshot.notes[0].field(&key), Some("tomorrow"));

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["columns"][1]["display_name"], "When");
}

#[test]
fn render_note_passes_content_to_renderer() {
    let (_dir, service) = new_service();
    let id = service
        .store()
        .add_note("<b>hi</b> & bye", &NoteFields::new())
        .unwrap();

    assert_eq!(
        service.render_note(id, &UppercaseRenderer).unwrap(),
        "<p><B>HI</B> & BYE</p>"
    );
    assert_eq!(
        service.render_note(id, &EscapedTextRenderer).unwrap(),
        "<pre>&lt;b&gt;hi&lt;/b&gt; &amp; bye</pre>"
    );
    assert_eq!(
        service.render_note(id + 1, &EscapedTextRenderer).unwrap(),
        "<pre></pre>"
    );
}
