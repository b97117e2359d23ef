#![forbid(unsafe_code)]

use rt_core::{AnchorId, AnchorSubject, EntryId, EntryKind, ItemId, OutlineId, ReadingId, TagId};
use serde::Serialize;

use super::TagRow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnchorRow {
    pub id: AnchorId,
    pub project_id: ItemId,
    pub reading_id: ReadingId,
    pub outline_id: Option<OutlineId>,
    /// Primary tag: the first linked tag by insertion.
    pub tag_id: Option<TagId>,
    pub unique_doc_id: String,
    pub subject: AnchorSubject,
    pub tag_ids: Vec<TagId>,
}

impl AnchorRow {
    pub fn selected_text(&self) -> &str {
        self.subject.display_text()
    }

    pub fn comment(&self) -> Option<&str> {
        match &self.subject {
            AnchorSubject::Text { comment, .. } => comment.as_deref(),
            AnchorSubject::Virtual { .. } => None,
        }
    }

    pub fn item_link_id(&self) -> Option<EntryId> {
        match &self.subject {
            AnchorSubject::Virtual { entry_id, .. } => Some(*entry_id),
            AnchorSubject::Text { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnchorDetails {
    pub anchor: AnchorRow,
    pub tags: Vec<TagRow>,
    pub reading_title: String,
    pub outline_title: Option<String>,
}

/// Anchor joined with the names of its reading, outline section and project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnchorContextRow {
    pub id: AnchorId,
    pub selected_text: Option<String>,
    pub comment: Option<String>,
    pub project_id: ItemId,
    pub project_name: String,
    pub reading_id: ReadingId,
    pub reading_title: String,
    pub reading_nickname: Option<String>,
    pub outline_id: Option<OutlineId>,
    pub outline_title: Option<String>,
    pub item_link_id: Option<EntryId>,
    pub item_type: Option<EntryKind>,
}

/// A passage anchor to create. The first tag becomes the primary tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTextAnchor {
    pub project_id: ItemId,
    pub reading_id: ReadingId,
    pub outline_id: Option<OutlineId>,
    pub tag_ids: Vec<TagId>,
    pub unique_doc_id: String,
    pub selected_text: String,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextAnchorUpdate {
    pub selected_text: String,
    pub comment: Option<String>,
    pub tag_ids: Vec<TagId>,
}
