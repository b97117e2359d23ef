#![forbid(unsafe_code)]

mod common;

use common::{project, reading, section, store};
use rt_core::{ProjectPropositionId, ReadingId, TerminologyId};
use rt_storage::{NoteReference, ProjectPropositionDraft, ReadingStatus, StoreError, TermDraft};

fn status(reading_id: ReadingId, not_in_reading: bool) -> ReadingStatus {
    ReadingStatus {
        reading_id,
        not_in_reading,
    }
}

fn reference(reading_id: ReadingId, page: &str) -> NoteReference {
    NoteReference {
        reading_id,
        outline_id: None,
        page_number: Some(page.to_string()),
        addressed: None,
        notes: None,
    }
}

fn term(text: &str) -> TermDraft {
    TermDraft {
        term: text.to_string(),
        ..TermDraft::default()
    }
}

#[test]
fn references_into_readings_marked_absent_are_dropped() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let republic = reading(&mut store, project_id, "Republic");
    let laws = reading(&mut store, project_id, "Laws");
    let book_iv = section(&mut store, republic, "Book IV", None);

    let draft = TermDraft {
        term: "Justice".to_string(),
        meaning: Some("Each part doing its own work".to_string()),
        statuses: vec![status(laws, true), status(republic, false)],
        references: vec![
            NoteReference {
                outline_id: Some(book_iv),
                addressed: Some("defined through the city".to_string()),
                ..reference(republic, "433a")
            },
            reference(laws, "631c"),
        ],
    };
    let term_id = store
        .save_terminology(project_id, None, &draft)
        .expect("save term");

    let details = store
        .get_terminology_details(term_id)
        .unwrap()
        .expect("term details");
    assert_eq!(details.term, "Justice");
    assert_eq!(details.meaning.as_deref(), Some("Each part doing its own work"));
    assert_eq!(details.project_id, project_id);
    assert_eq!(
        details.statuses,
        vec![status(republic, false), status(laws, true)]
    );
    assert_eq!(details.references.len(), 1);
    let kept = &details.references[0];
    assert_eq!(kept.reading_id, republic);
    assert_eq!(kept.section_title.as_deref(), Some("Book IV"));
    assert_eq!(kept.page_number.as_deref(), Some("433a"));
    assert_eq!(kept.addressed.as_deref(), Some("defined through the city"));
}

#[test]
fn saving_again_upserts_statuses_and_replaces_references() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let first = reading(&mut store, project_id, "First");
    let second = reading(&mut store, project_id, "Second");

    let term_id = store
        .save_terminology(
            project_id,
            None,
            &TermDraft {
                term: "Eros".to_string(),
                statuses: vec![status(first, false), status(second, true)],
                references: vec![reference(first, "1"), reference(first, "2")],
                ..TermDraft::default()
            },
        )
        .unwrap();

    let same_id = store
        .save_terminology(
            project_id,
            Some(term_id),
            &TermDraft {
                term: "  Love ".to_string(),
                statuses: vec![status(second, false)],
                references: vec![reference(second, "9")],
                ..TermDraft::default()
            },
        )
        .expect("update term");
    assert_eq!(same_id, term_id);

    let details = store.get_terminology_details(term_id).unwrap().unwrap();
    assert_eq!(details.term, "Love");
    assert_eq!(details.meaning, None);
    assert_eq!(
        details.statuses,
        vec![status(first, false), status(second, false)]
    );
    let pages: Vec<_> = details
        .references
        .iter()
        .map(|r| (r.reading_id, r.page_number.as_deref()))
        .collect();
    assert_eq!(pages, vec![(second, Some("9"))]);
}

#[test]
fn terminology_appends_and_reorders_per_project() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let other_project = project(&mut store, "Other");
    let a = store.save_terminology(project_id, None, &term("Arete")).unwrap();
    let b = store.save_terminology(project_id, None, &term("Bios")).unwrap();
    let c = store.save_terminology(project_id, None, &term("Cosmos")).unwrap();
    store.save_terminology(other_project, None, &term("Elsewhere")).unwrap();

    let orders: Vec<i64> = [a, b, c]
        .iter()
        .map(|id| store.get_terminology_details(*id).unwrap().unwrap().display_order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);

    store
        .update_terminology_order(project_id, &[c, a, b])
        .expect("reorder");
    let names: Vec<_> = store
        .list_terminology(project_id)
        .unwrap()
        .into_iter()
        .map(|summary| summary.term)
        .collect();
    assert_eq!(names, vec!["Cosmos", "Arete", "Bios"]);

    let err = store
        .update_terminology_order(project_id, &[a, b])
        .expect_err("partial ordering");
    assert!(
        matches!(err, StoreError::IncompleteOrdering { expected: 3, given: 2 }),
        "{err:?}"
    );
}

#[test]
fn deletes_cascade_into_statuses_and_references() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let kept_reading = reading(&mut store, project_id, "Kept");
    let dropped_reading = reading(&mut store, project_id, "Dropped");
    let chapter = section(&mut store, kept_reading, "Chapter 1", None);

    let term_id = store
        .save_terminology(
            project_id,
            None,
            &TermDraft {
                term: "Logos".to_string(),
                statuses: vec![status(kept_reading, false), status(dropped_reading, false)],
                references: vec![
                    NoteReference {
                        outline_id: Some(chapter),
                        ..reference(kept_reading, "12")
                    },
                    reference(dropped_reading, "40"),
                ],
                ..TermDraft::default()
            },
        )
        .unwrap();

    store.delete_outline_section(chapter).unwrap();
    store.delete_reading(dropped_reading).unwrap();

    let details = store.get_terminology_details(term_id).unwrap().unwrap();
    assert_eq!(details.statuses, vec![status(kept_reading, false)]);
    assert_eq!(details.references.len(), 1);
    assert_eq!(details.references[0].outline_id, None);
    assert_eq!(details.references[0].section_title, None);
    assert_eq!(details.references[0].page_number.as_deref(), Some("12"));

    store.delete_item(project_id).unwrap();
    assert!(store.get_terminology_details(term_id).unwrap().is_none());
}

#[test]
fn saves_reject_blank_names_and_foreign_readings() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let other_project = project(&mut store, "Other");
    let own = reading(&mut store, project_id, "Own");
    let foreign = reading(&mut store, other_project, "Foreign");
    let foreign_section = section(&mut store, foreign, "Elsewhere", None);

    let err = store
        .save_terminology(project_id, None, &term("   "))
        .expect_err("blank term");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");

    let err = store
        .save_terminology(
            project_id,
            None,
            &TermDraft {
                term: "Nous".to_string(),
                references: vec![reference(foreign, "1")],
                ..TermDraft::default()
            },
        )
        .expect_err("reading of another project");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");

    let err = store
        .save_terminology(
            project_id,
            None,
            &TermDraft {
                term: "Nous".to_string(),
                references: vec![NoteReference {
                    outline_id: Some(foreign_section),
                    ..reference(own, "1")
                }],
                ..TermDraft::default()
            },
        )
        .expect_err("section of another reading");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");
    assert!(store.list_terminology(project_id).unwrap().is_empty());

    let term_id = store.save_terminology(project_id, None, &term("Nous")).unwrap();
    let err = store
        .save_terminology(other_project, Some(term_id), &term("Moved"))
        .expect_err("term belongs to another project");
    assert!(matches!(err, StoreError::NotFound { .. }), "{err:?}");
    let err = store
        .save_terminology(project_id, Some(TerminologyId::new(99)), &term("Ghost"))
        .expect_err("missing term");
    assert!(
        matches!(err, StoreError::NotFound { entity: "terminology", id: 99 }),
        "{err:?}"
    );
    assert_eq!(
        store.get_terminology_details(term_id).unwrap().unwrap().term,
        "Nous"
    );
}

#[test]
fn project_propositions_follow_the_same_rules() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let absent = reading(&mut store, project_id, "Absent");
    let present = reading(&mut store, project_id, "Present");

    let first = store
        .save_project_proposition(
            project_id,
            None,
            &ProjectPropositionDraft {
                display_name: "Virtue is knowledge".to_string(),
                proposition_html: Some("<p>Nobody errs willingly</p>".to_string()),
                statuses: vec![status(absent, true)],
                references: vec![
                    reference(absent, "3"),
                    NoteReference {
                        addressed: Some("argued by elenchus".to_string()),
                        ..reference(present, "87c")
                    },
                ],
            },
        )
        .expect("save proposition");
    let second = store
        .save_project_proposition(
            project_id,
            None,
            &ProjectPropositionDraft {
                display_name: "The soul is immortal".to_string(),
                ..ProjectPropositionDraft::default()
            },
        )
        .unwrap();

    let details = store
        .get_project_proposition_details(first)
        .unwrap()
        .expect("proposition details");
    assert_eq!(details.proposition_html.as_deref(), Some("<p>Nobody errs willingly</p>"));
    assert_eq!(details.statuses, vec![status(absent, true)]);
    assert_eq!(details.references.len(), 1);
    assert_eq!(details.references[0].reading_id, present);
    assert_eq!(details.references[0].addressed.as_deref(), Some("argued by elenchus"));

    store
        .update_project_proposition_order(project_id, &[second, first])
        .unwrap();
    let names: Vec<_> = store
        .list_project_propositions(project_id)
        .unwrap()
        .into_iter()
        .map(|summary| summary.display_name)
        .collect();
    assert_eq!(names, vec!["The soul is immortal", "Virtue is knowledge"]);

    store.delete_project_proposition(first).expect("delete");
    assert!(store.get_project_proposition_details(first).unwrap().is_none());
    let err = store
        .delete_project_proposition(first)
        .expect_err("already deleted");
    assert!(matches!(err, StoreError::NotFound { .. }), "{err:?}");
    let err = store
        .delete_project_proposition(ProjectPropositionId::new(404))
        .expect_err("missing proposition");
    assert!(
        matches!(err, StoreError::NotFound { entity: "project proposition", id: 404 }),
        "{err:?}"
    );
}
