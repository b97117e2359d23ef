#![forbid(unsafe_code)]
#![allow(dead_code)]

use rt_core::{
    DrivingQuestion, EntryPayload, ItemId, KeyTerm, OutlineId, ReadingId, TagId,
};
use rt_storage::{NewItem, NewTextAnchor, ReadingDetails, SqliteStore};

pub fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("open in-memory store")
}

pub fn project(store: &mut SqliteStore, name: &str) -> ItemId {
    store
        .create_item(NewItem::project(name))
        .expect("create project")
}

pub fn reading(store: &mut SqliteStore, project_id: ItemId, title: &str) -> ReadingId {
    store
        .add_reading(project_id, &ReadingDetails::titled(title))
        .expect("add reading")
}

pub fn section(
    store: &mut SqliteStore,
    reading_id: ReadingId,
    title: &str,
    parent: Option<OutlineId>,
) -> OutlineId {
    store
        .add_outline_section(reading_id, title, parent)
        .expect("add outline section")
}

pub fn tag(store: &mut SqliteStore, name: &str, project_id: ItemId) -> TagId {
    store
        .get_or_create_tag(name, Some(project_id))
        .expect("get or create tag")
        .expect("non-blank tag name")
        .id
}

pub fn text_anchor(
    project_id: ItemId,
    reading_id: ReadingId,
    text: &str,
    tag_ids: Vec<TagId>,
) -> NewTextAnchor {
    NewTextAnchor {
        project_id,
        reading_id,
        outline_id: None,
        tag_ids,
        unique_doc_id: format!("doc_{}", reading_id.get()),
        selected_text: text.to_string(),
        comment: None,
    }
}

pub fn question(text: &str) -> EntryPayload {
    EntryPayload::DrivingQuestion(DrivingQuestion {
        question_text: text.to_string(),
        ..DrivingQuestion::default()
    })
}

pub fn term(text: &str) -> EntryPayload {
    EntryPayload::KeyTerm(KeyTerm {
        term: text.to_string(),
        ..KeyTerm::default()
    })
}
