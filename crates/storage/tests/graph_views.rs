#![forbid(unsafe_code)]

mod common;

use common::{project, question, reading, store, tag, term, text_anchor};
use rt_core::EntryKind;
use rt_storage::{NewItem, ReadingTagEdge};

#[test]
fn project_graph_links_readings_to_tags_through_text_anchors_only() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let first = reading(&mut store, project_id, "First");
    let second = reading(&mut store, project_id, "Second");
    store.update_reading_nickname(second, "2nd").unwrap();
    let shared = tag(&mut store, "shared", project_id);
    let lonely = tag(&mut store, "lonely", project_id);

    store
        .create_anchor(&text_anchor(project_id, first, "a", vec![shared]))
        .unwrap();
    store
        .create_anchor(&text_anchor(project_id, first, "b", vec![shared]))
        .unwrap();
    store.add_entry(second, &term("Virtual only"), "from-entry").unwrap();

    let graph = store.project_graph(project_id).unwrap();
    assert_eq!(
        graph.readings.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["First", "2nd"]
    );
    assert_eq!(
        graph.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["from-entry", "lonely", "shared"]
    );
    assert_eq!(
        graph.edges,
        vec![ReadingTagEdge {
            reading_id: first,
            tag_id: shared
        }]
    );
    assert!(graph.tags.iter().any(|t| t.id == lonely));
}

#[test]
fn full_project_graph_lists_virtual_anchors_with_their_kind() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    let question_id = store
        .add_entry(reading_id, &question("Why read?"), "alpha, beta")
        .unwrap();
    let term_id = store.add_entry(reading_id, &term("Praxis"), "alpha").unwrap();

    let graph = store.project_graph_full(project_id).unwrap();
    assert!(graph.edges.is_empty());
    let rows: Vec<_> = graph
        .virtual_anchors
        .iter()
        .map(|edge| (edge.item_link_id, edge.kind, edge.tag_id.is_some()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (question_id, EntryKind::DrivingQuestion, true),
            (question_id, EntryKind::DrivingQuestion, true),
            (term_id, EntryKind::KeyTerm, true),
        ]
    );
    assert_eq!(graph.virtual_anchors[2].summary, "Term: Praxis");
    assert_eq!(graph.virtual_anchors[0].reading_id, reading_id);
}

#[test]
fn global_graph_derives_edges_from_anchors() {
    let mut store = store();
    let class_id = store
        .create_item(NewItem {
            name: "Class".to_string(),
            kind: rt_core::ItemKind::Class,
            parent_id: None,
            is_assignment: false,
        })
        .unwrap();
    let alpha_project = project(&mut store, "Alpha");
    let beta_project = store
        .create_item(NewItem::project("Beta").under(class_id))
        .unwrap();
    let alpha_reading = reading(&mut store, alpha_project, "A");
    let beta_reading = reading(&mut store, beta_project, "B");

    let common_tag = tag(&mut store, "common", alpha_project);
    let linked_only = tag(&mut store, "linked-only", beta_project);
    store
        .create_anchor(&text_anchor(alpha_project, alpha_reading, "x", vec![common_tag]))
        .unwrap();
    store
        .create_anchor(&text_anchor(beta_project, beta_reading, "y", vec![common_tag]))
        .unwrap();

    let graph = store.global_graph().unwrap();
    assert_eq!(
        graph.projects.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        vec!["Alpha", "Beta"]
    );
    let counts: Vec<(&str, i64)> = graph
        .tags
        .iter()
        .map(|t| (t.name.as_str(), t.project_count))
        .collect();
    assert_eq!(counts, vec![("common", 2), ("linked-only", 0)]);
    assert_eq!(graph.edges.len(), 2);
    assert!(graph.edges.iter().all(|edge| edge.tag_id == common_tag));
    assert!(graph.edges.iter().all(|edge| edge.tag_id != linked_only));
}

#[test]
fn graph_payloads_serialize_to_plain_json() {
    let mut store = store();
    let project_id = project(&mut store, "P");
    let reading_id = reading(&mut store, project_id, "R");
    store.add_entry(reading_id, &term("Mimesis"), "art").unwrap();

    let graph = store.project_graph_full(project_id).unwrap();
    let value = serde_json::to_value(&graph).expect("serialize graph");
    assert_eq!(value["readings"][0]["title"], "R");
    assert_eq!(value["tags"][0]["name"], "art");
    assert_eq!(value["virtual_anchors"][0]["kind"], "key_term");
    assert_eq!(value["virtual_anchors"][0]["item_link_id"], serde_json::json!(1));

    let anchors = store.get_anchors_for_project(project_id).unwrap();
    let value = serde_json::to_value(&anchors).expect("serialize anchors");
    assert_eq!(value[0]["subject"]["subject"], "virtual");
    assert_eq!(value[0]["subject"]["summary"], "Term: Mimesis");
}
