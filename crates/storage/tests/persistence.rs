#![forbid(unsafe_code)]

mod common;

use common::{question, term};
use rt_storage::{NewItem, ReadingDetails, SpellChecker, SqliteStore, StoreConfig, StoreError};
use rusqlite::{Connection, params};

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let project_id;
    {
        let mut store = SqliteStore::open(dir.path()).expect("open store");
        assert_eq!(store.storage_dir(), Some(dir.path()));
        project_id = store.create_item(NewItem::project("Kept")).unwrap();
        store
            .add_reading(project_id, &ReadingDetails::titled("Phaedo"))
            .unwrap();
    }

    let store = SqliteStore::open(dir.path()).expect("reopen store");
    let readings = store.list_readings(project_id).unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].title, "Phaedo");
    assert!(dir.path().join("reading_tracker.db").exists());
}

#[test]
fn virtual_anchor_rows_and_tag_cache_match_the_links() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    let project_id = store.create_item(NewItem::project("P")).unwrap();
    let reading_id = store
        .add_reading(project_id, &ReadingDetails::titled("R"))
        .unwrap();
    let question_id = store
        .add_entry(reading_id, &question("Why?"), "alpha, beta")
        .unwrap();
    let term_id = store.add_entry(reading_id, &term("Logos"), "").unwrap();

    let raw = Connection::open(dir.path().join("reading_tracker.db")).expect("raw connection");
    let (item_type, selected_text, links): (String, String, i64) = raw
        .query_row(
            "SELECT a.item_type, a.selected_text, \
               (SELECT COUNT(*) FROM anchor_tag_links l WHERE l.anchor_id = a.id) \
             FROM synthesis_anchors a WHERE a.item_link_id = ?1",
            params![question_id.get()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .expect("virtual anchor row");
    assert_eq!(item_type, "dq");
    assert!(selected_text.starts_with("Dq: "));
    assert_eq!(links, 2);

    let cached: Option<String> = raw
        .query_row(
            "SELECT synthesis_tags FROM reading_driving_questions WHERE id = ?1",
            params![question_id.get()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(cached.as_deref(), Some("alpha, beta"));
    let untagged: Option<String> = raw
        .query_row(
            "SELECT synthesis_tags FROM reading_driving_questions WHERE id = ?1",
            params![term_id.get()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(untagged, None);

    let stored_type: String = raw
        .query_row(
            "SELECT type FROM reading_driving_questions WHERE id = ?1",
            params![term_id.get()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored_type, "term");

    // A second virtual anchor for the same entry is refused by the schema.
    let err = raw
        .execute(
            "INSERT INTO synthesis_anchors(project_id, reading_id, item_link_id, unique_doc_id, \
               selected_text, item_type) VALUES (?1, ?2, ?3, 'dup', 'dup', 'dq')",
            params![project_id.get(), reading_id.get(), question_id.get()],
        )
        .expect_err("duplicate virtual anchor");
    assert!(err.to_string().contains("UNIQUE"), "{err}");
}

#[test]
fn failed_write_leaves_no_partial_state() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let project_id = store.create_item(NewItem::project("P")).unwrap();
    let reading_id = store
        .add_reading(project_id, &ReadingDetails::titled("R"))
        .unwrap();
    let missing_tag = rt_core::TagId::new(42);
    let fine = store.get_or_create_tag("fine", None).unwrap().unwrap();

    let err = store
        .create_anchor(&common::text_anchor(
            project_id,
            reading_id,
            "passage",
            vec![fine.id, missing_tag],
        ))
        .expect_err("missing tag");
    assert!(matches!(err, StoreError::NotFound { entity: "tag", id: 42 }), "{err:?}");
    assert!(store.get_anchors_for_project(project_id).unwrap().is_empty());
    assert!(store.list_project_tags(project_id).unwrap().is_empty());
}

#[test]
fn backup_writes_a_readable_copy() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path().join("live")).expect("open store");
    let project_id = store.create_item(NewItem::project("Backed up")).unwrap();

    let dest = dir.path().join("backups").join("copy.db");
    store.backup_to(&dest).expect("backup");
    let err = store.backup_to(&dest).expect_err("destination exists");
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let config = StoreConfig {
        db_file_name: "copy.db".to_string(),
        ..StoreConfig::for_dir(dir.path().join("backups"))
    };
    let restored = SqliteStore::open_with_config(&config).expect("open backup");
    let item = restored.get_item(project_id).unwrap().expect("item in backup");
    assert_eq!(item.name, "Backed up");
}

#[test]
fn config_file_selects_database_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("tracker.toml");
    let storage_dir = dir.path().join("data");
    std::fs::write(
        &config_path,
        format!(
            "storage_dir = {:?}\ndb_file_name = \"library.db\"\nbusy_timeout_ms = 250\n",
            storage_dir.display().to_string()
        ),
    )
    .unwrap();

    let config = StoreConfig::load(&config_path).expect("load config");
    assert_eq!(config.busy_timeout_ms, 250);
    assert_eq!(config.log_level, "info");
    rt_storage::logging::init(&config.log_level);

    let mut store = SqliteStore::open_with_config(&config).expect("open with config");
    store.create_item(NewItem::project("P")).unwrap();
    assert!(storage_dir.join("library.db").exists());
}

#[test]
fn newer_schema_versions_are_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    drop(SqliteStore::open(dir.path()).expect("create store"));
    let raw = Connection::open(dir.path().join("reading_tracker.db")).unwrap();
    raw.execute("UPDATE meta SET value = '99' WHERE key = 'schema_version'", [])
        .unwrap();
    drop(raw);

    let err = SqliteStore::open(dir.path()).expect_err("unsupported version");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");
}

#[test]
fn custom_dictionary_is_created_and_extended() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dictionary = dir.path().join("custom_dictionary.txt");

    let mut checker =
        SpellChecker::new(["reading", "notes"], Some(dictionary.as_path())).expect("checker");
    let header = std::fs::read_to_string(&dictionary).unwrap();
    assert!(header.starts_with('#'));
    assert!(checker.is_misspelled("syntopical"));

    assert!(checker.add_to_dictionary(" Syntopical ").unwrap());
    assert!(!checker.add_to_dictionary("syntopical").unwrap());
    assert!(!checker.is_misspelled("Syntopical"));

    let reloaded = SpellChecker::new(["reading"], Some(dictionary.as_path())).expect("reload");
    assert!(!reloaded.is_misspelled("syntopical"));
    assert!(reloaded.is_misspelled("custom"));
    assert_eq!(
        reloaded.misspelled_words("Syntopical reading of Adler's notes"),
        vec!["of", "notes"]
    );
}
