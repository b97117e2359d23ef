#![forbid(unsafe_code)]

mod common;

use common::{project, question, reading, store, tag, term, text_anchor};
use rt_core::{EntryKind, TagId};
use rt_storage::StoreError;

#[test]
fn get_or_create_trims_and_reuses_names() {
    let mut store = store();
    let project_id = project(&mut store, "P");

    let created = store
        .get_or_create_tag("  Ethics ", Some(project_id))
        .unwrap()
        .expect("tag");
    assert_eq!(created.name, "Ethics");
    let again = store.get_or_create_tag("Ethics", None).unwrap().expect("tag");
    assert_eq!(again.id, created.id);

    // Names are case-sensitive.
    let lower = store.get_or_create_tag("ethics", None).unwrap().expect("tag");
    assert_ne!(lower.id, created.id);

    assert_eq!(store.get_or_create_tag("   ", Some(project_id)).unwrap(), None);
    assert_eq!(store.list_tags().unwrap().len(), 2);
}

#[test]
fn merge_moves_every_anchor_and_deletes_the_source() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let ai = tag(&mut store, "AI", project_id);
    let artificial = tag(&mut store, "Artificial Intelligence", project_id);

    let first = store
        .create_anchor(&text_anchor(project_id, reading_id, "one", vec![ai]))
        .unwrap();
    let second = store
        .create_anchor(&text_anchor(project_id, reading_id, "two", vec![artificial]))
        .unwrap();

    let report = store.merge_tags(ai, artificial).expect("merge");
    assert_eq!(report.source, ai);
    assert_eq!(report.target.id, artificial);
    assert_eq!(report.anchors_relinked, 1);
    assert_eq!(report.duplicate_links_dropped, 0);

    let ids: Vec<_> = store
        .get_anchors_for_tag(artificial)
        .unwrap()
        .into_iter()
        .map(|anchor| anchor.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
    assert!(store.get_anchors_for_tag(ai).unwrap().is_empty());
    assert!(store.get_tag(ai).unwrap().is_none());
    assert!(store.get_tag_by_name("AI").unwrap().is_none());
}

#[test]
fn merge_drops_duplicate_links_and_keeps_positions() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let other_project = project(&mut store, "Q");
    let reading_id = reading(&mut store, project_id, "R");
    let source = tag(&mut store, "source", project_id);
    let target = tag(&mut store, "target", project_id);
    let extra = tag(&mut store, "extra", project_id);
    store.add_project_tag(other_project, source).unwrap();

    let both = store
        .create_anchor(&text_anchor(project_id, reading_id, "both", vec![source, extra, target]))
        .unwrap();
    let only_source = store
        .create_anchor(&text_anchor(project_id, reading_id, "only", vec![extra, source]))
        .unwrap();

    let report = store.merge_tags(source, target).unwrap();
    assert_eq!(report.anchors_relinked, 1);
    assert_eq!(report.duplicate_links_dropped, 1);

    let both_row = store.get_anchor(both).unwrap().unwrap();
    assert_eq!(both_row.tag_ids, vec![extra, target]);
    assert_eq!(both_row.tag_id, Some(extra));

    let only_row = store.get_anchor(only_source).unwrap().unwrap();
    assert_eq!(only_row.tag_ids, vec![extra, target]);
    assert_eq!(only_row.tag_id, Some(extra));

    let other_tags: Vec<TagId> = store
        .list_project_tags(other_project)
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(other_tags, vec![target]);

    let counts = store.list_tags_with_counts().unwrap();
    let target_count = counts.iter().find(|row| row.id == target).unwrap();
    assert_eq!(target_count.anchor_count, 2);
    assert!(counts.iter().all(|row| row.id != source));
}

#[test]
fn merge_with_primary_source_promotes_target() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let source = tag(&mut store, "old", project_id);
    let target = tag(&mut store, "new", project_id);
    let anchor_id = store
        .create_anchor(&text_anchor(project_id, reading_id, "x", vec![source]))
        .unwrap();

    store.merge_tags(source, target).unwrap();
    let anchor = store.get_anchor(anchor_id).unwrap().unwrap();
    assert_eq!(anchor.tag_id, Some(target));
    assert_eq!(anchor.tag_ids, vec![target]);
}

#[test]
fn merge_refreshes_entry_tag_text() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let entry_id = store.add_entry(reading_id, &term("Nous"), "mind, intellect").unwrap();
    let mind = store.get_tag_by_name("mind").unwrap().unwrap().id;
    let intellect = store.get_tag_by_name("intellect").unwrap().unwrap().id;

    store.merge_tags(mind, intellect).unwrap();
    let entry = store.get_entry(entry_id, EntryKind::KeyTerm).unwrap().unwrap();
    assert_eq!(entry.tags, vec!["intellect".to_string()]);
}

#[test]
fn merging_a_tag_into_itself_is_rejected() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let only = tag(&mut store, "only", project_id);
    let err = store.merge_tags(only, only).expect_err("self merge");
    assert!(matches!(err, StoreError::InvalidInput(_)), "{err:?}");
    assert!(store.get_tag(only).unwrap().is_some());
}

#[test]
fn merge_with_missing_target_rolls_back() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let source = tag(&mut store, "source", project_id);
    store
        .create_anchor(&text_anchor(project_id, reading_id, "x", vec![source]))
        .unwrap();

    let err = store
        .merge_tags(source, TagId::new(9_999))
        .expect_err("missing target");
    assert!(matches!(err, StoreError::NotFound { entity: "tag", .. }), "{err:?}");
    assert_eq!(store.get_anchors_for_tag(source).unwrap().len(), 1);
}

#[test]
fn rename_collision_is_a_conflict_not_a_merge() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let first = tag(&mut store, "first", project_id);
    let second = tag(&mut store, "second", project_id);

    let err = store.rename_tag(first, " second ").expect_err("collision");
    match err {
        StoreError::TagNameConflict { name, existing_id } => {
            assert_eq!(name, "second");
            assert_eq!(existing_id, second.get());
        }
        other => panic!("expected TagNameConflict, got {other:?}"),
    }
    assert!(StoreError::TagNameConflict {
        name: String::new(),
        existing_id: 0
    }
    .is_user_actionable());
    assert_eq!(store.get_tag(first).unwrap().unwrap().name, "first");
}

#[test]
fn rename_updates_cached_entry_tags() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let entry_id = store
        .add_entry(reading_id, &question("Why?"), "draft")
        .unwrap();
    let draft = store.get_tag_by_name("draft").unwrap().unwrap().id;

    let renamed = store.rename_tag(draft, "final").unwrap();
    assert_eq!(renamed.name, "final");
    let entry = store
        .get_entry(entry_id, EntryKind::DrivingQuestion)
        .unwrap()
        .unwrap();
    assert_eq!(entry.tags_text(), "final");
}

#[test]
fn delete_tag_and_anchors_removes_the_anchors_themselves() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let doomed = tag(&mut store, "doomed", project_id);
    let kept = tag(&mut store, "kept", project_id);

    let shared = store
        .create_anchor(&text_anchor(project_id, reading_id, "shared", vec![kept, doomed]))
        .unwrap();
    let survivor = store
        .create_anchor(&text_anchor(project_id, reading_id, "survivor", vec![kept]))
        .unwrap();
    let entry_id = store.add_entry(reading_id, &term("Arete"), "doomed").unwrap();

    let removed = store.delete_tag_and_anchors(doomed).expect("delete");
    assert_eq!(removed, 2);
    assert!(store.get_anchor(shared).unwrap().is_none());
    assert!(store.get_anchor(survivor).unwrap().is_some());
    assert!(store.get_tag(doomed).unwrap().is_none());

    let entry = store.get_entry(entry_id, EntryKind::KeyTerm).unwrap().unwrap();
    assert!(entry.tags.is_empty());
    let names: Vec<String> = store
        .list_project_tags(project_id)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["kept".to_string()]);
}

#[test]
fn delete_tag_keeps_text_anchors_and_drops_untagged_virtual_ones() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let gone = tag(&mut store, "gone", project_id);
    let stays = tag(&mut store, "stays", project_id);

    let text = store
        .create_anchor(&text_anchor(project_id, reading_id, "passage", vec![gone, stays]))
        .unwrap();
    let lonely = store.add_entry(reading_id, &term("Alone"), "gone").unwrap();
    let paired = store.add_entry(reading_id, &term("Pair"), "gone, stays").unwrap();

    store.delete_tag(gone).expect("delete tag");

    let text_row = store.get_anchor(text).unwrap().expect("text anchor survives");
    assert_eq!(text_row.tag_ids, vec![stays]);
    assert_eq!(text_row.tag_id, Some(stays));

    let lonely_row = store.get_entry(lonely, EntryKind::KeyTerm).unwrap().unwrap();
    assert!(lonely_row.tags.is_empty());
    let paired_row = store.get_entry(paired, EntryKind::KeyTerm).unwrap().unwrap();
    assert_eq!(paired_row.tags, vec!["stays".to_string()]);

    let virtual_links: Vec<_> = store
        .get_anchors_for_project(project_id)
        .unwrap()
        .into_iter()
        .filter_map(|anchor| anchor.item_link_id())
        .collect();
    assert_eq!(virtual_links, vec![paired]);
}

#[test]
fn project_tags_include_orphaned_links_and_anchor_tags() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let orphan = tag(&mut store, "orphan", project_id);
    let anchor_id = store
        .create_anchor(&text_anchor(project_id, reading_id, "x", vec![orphan]))
        .unwrap();
    store.delete_anchor(anchor_id).unwrap();

    let tags = store.list_project_tags(project_id).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, orphan);

    let graph = store.project_graph(project_id).unwrap();
    assert_eq!(graph.tags.len(), 1);
    assert!(graph.edges.is_empty());

    // Removing the explicit link hides it once no anchor uses it.
    assert!(store.remove_project_tag(project_id, orphan).unwrap());
    assert!(store.list_project_tags(project_id).unwrap().is_empty());
    assert!(store.get_tag(orphan).unwrap().is_some());
}

#[test]
fn tag_counts_count_distinct_anchors() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let busy = tag(&mut store, "busy", project_id);
    let idle = tag(&mut store, "idle", project_id);
    for text in ["a", "b", "c"] {
        store
            .create_anchor(&text_anchor(project_id, reading_id, text, vec![busy]))
            .unwrap();
    }

    let counts = store.list_tags_with_counts().unwrap();
    let names: Vec<(&str, i64)> = counts
        .iter()
        .map(|row| (row.name.as_str(), row.anchor_count))
        .collect();
    assert_eq!(names, vec![("busy", 3), ("idle", 0)]);
    assert_eq!(counts[1].id, idle);
}
