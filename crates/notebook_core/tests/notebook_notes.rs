use notebook_core::{
    NoteFields, NotebookStore, SchemaError, SqliteNotebookStore, StoreConfig, StoreError, MARKER,
};
use tempfile::TempDir;

fn new_store(name: &str) -> (TempDir, SqliteNotebookStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteNotebookStore::open(dir.path().join("notes.cnb"), StoreConfig::default())
        .unwrap();
    store.create_notebook(name).unwrap();
    (dir, store)
}

fn fields(pairs: &[(&str, Option<&str>)]) -> NoteFields {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.map(str::to_string)))
        .collect()
}

#[test]
fn add_get_delete_note() {
    let (_dir, store) = new_store("Basics");
    let id = store.add_note("hello", &NoteFields::new()).unwrap();

    let note = store.note(id).unwrap().unwrap();
    assert_eq!(note.id, id);
    assert_eq!(note.content, "hello");
    assert_eq!(store.note_content(id).unwrap(), "hello");

    assert!(store.delete_note(id).unwrap());
    assert!(store.note(id).unwrap().is_none());
    assert_eq!(store.note_content(id).unwrap(), "");
}

#[test]
fn delete_missing_note_is_not_an_error() {
    let (_dir, store) = new_store("Missing");
    assert!(!store.delete_note(404).unwrap());
}

#[test]
fn note_ids_increase_and_are_not_reused() {
    let (_dir, store) = new_store("Ids");
    let first = store.add_note("one", &NoteFields::new()).unwrap();
    let second = store.add_note("two", &NoteFields::new()).unwrap();
    assert!(second > first);

    store.delete_note(second).unwrap();
    let third = store.add_note("three", &NoteFields::new()).unwrap();
    assert!(third > second);
}

#[test]
fn columns_added_later_read_as_null() {
    let (_dir, mut store) = new_store("Late");
    let id = store.add_note("before", &NoteFields::new()).unwrap();
    let column = store.add_column("Added Later").unwrap();

    let note = store.note(id).unwrap().unwrap();
    assert!(note.has_field(&column.storage_key));
    assert_eq!(note.field(&column.storage_key), None);
}

#[test]
fn edit_note_fields_updates_named_fields_only() {
    let (_dir, mut store) = new_store("Edit");
    let status = store.add_column("Status").unwrap().storage_key;
    let owner = store.add_column("Owner").unwrap().storage_key;
    let id = store
        .add_note(
            "task",
            &fields(&[(status.as_str(), Some("open")), (owner.as_str(), Some("sam"))]),
        )
        .unwrap();

    assert!(store
        .edit_note_fields(id, &fields(&[(status.as_str(), Some("done"))]))
        .unwrap());
    let note = store.note(id).unwrap().unwrap();
    assert_eq!(note.field(&status), Some("done"));
    assert_eq!(note.field(&owner), Some("sam"));

    assert!(store
        .edit_note_fields(id, &fields(&[(owner.as_str(), None)]))
        .unwrap());
    assert_eq!(store.note(id).unwrap().unwrap().field(&owner), None);
}

#[test]
fn edit_note_fields_with_no_updates_is_a_noop() {
    let (_dir, mut store) = new_store("Noop");
    let status = store.add_column("Status").unwrap().storage_key;
    let id = store
        .add_note("task", &fields(&[(status.as_str(), Some("open"))]))
        .unwrap();

    assert!(!store.edit_note_fields(id, &NoteFields::new()).unwrap());
    assert_eq!(store.note(id).unwrap().unwrap().field(&status), Some("open"));
}

#[test]
fn edit_note_fields_on_missing_note_reports_no_change() {
    let (_dir, mut store) = new_store("Gone");
    let status = store.add_column("Status").unwrap().storage_key;
    assert!(!store
        .edit_note_fields(99, &fields(&[(status.as_str(), Some("x"))]))
        .unwrap());
}

#[test]
fn note_writes_reject_unknown_and_reserved_field_keys() {
    let (_dir, mut store) = new_store("Guard");
    store.add_column("Status").unwrap();
    let id = store.add_note("body", &NoteFields::new()).unwrap();

    for key in ["Status", "id", "content", "_UNKNOWN", "x\" = 1; --"] {
        let add_err = store
            .add_note("body", &fields(&[(key, Some("v"))]))
            .unwrap_err();
        assert!(
            matches!(add_err, StoreError::Schema(SchemaError::UnknownField(ref k)) if k == key),
            "add with {key:?}"
        );

        let edit_err = store
            .edit_note_fields(id, &fields(&[(key, Some("v"))]))
            .unwrap_err();
        assert!(
            matches!(edit_err, StoreError::Schema(SchemaError::UnknownField(_))),
            "edit with {key:?}"
        );
    }
    assert_eq!(store.all_notes().unwrap().len(), 1);
}

#[test]
fn edit_note_content_overwrites_body() {
    let (_dir, store) = new_store("Content");
    let id = store.add_note("# Draft", &NoteFields::new()).unwrap();

    assert!(store.edit_note_content(id, "# Final\n\n**done**").unwrap());
    assert_eq!(store.note_content(id).unwrap(), "# Final\n\n**done**");
    assert!(!store.edit_note_content(id + 1, "nobody").unwrap());
}

#[test]
fn all_notes_excludes_content_and_orders_by_id() {
    let (_dir, mut store) = new_store("List");
    let key = store.add_column("Tag").unwrap().storage_key;
    let first = store.add_note("secret one", &fields(&[(key.as_str(), Some("a"))])).unwrap();
    let second = store.add_note("secret two", &NoteFields::new()).unwrap();

    let notes = store.all_notes().unwrap();
    assert_eq!(
        notes.iter().map(|note| note.id).collect::<Vec<_>>(),
        vec![first, second]
    );
    assert_eq!(notes[0].field(&key), Some("a"));
    assert_eq!(notes[1].field(&key), None);

    let json = serde_json::to_string(&notes).unwrap();
    assert!(!json.contains("secret"));
}

#[test]
fn trip_plans_scenario() {
    let (_dir, mut store) = new_store("Trip Plans");
    assert_eq!(store.title().unwrap(), "Trip Plans");

    let due = store.add_column("Due Date!").unwrap();
    assert!(due.storage_key.starts_with(MARKER));
    assert!(!due.storage_key.contains('='));
    assert!(!due.storage_key.contains(' '));

    let id = store
        .add_note("Pack bags", &fields(&[(due.storage_key.as_str(), Some("2024-01-01"))]))
        .unwrap();

    let notes = store.all_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, id);
    assert_eq!(notes[0].field(&due.storage_key), Some("2024-01-01"));

    store.delete_column("Due Date!").unwrap();
    let notes = store.all_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert!(!notes[0].has_field(&due.storage_key));
    assert_eq!(store.note_content(id).unwrap(), "Pack bags");
}
