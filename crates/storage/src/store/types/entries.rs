#![forbid(unsafe_code)]

use rt_core::{EntryId, EntryKind, EntryPayload, ReadingId};
use serde::Serialize;

/// One row of the shared entry table: identity and ordering plus the kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub id: EntryId,
    pub reading_id: ReadingId,
    pub display_order: i64,
    pub payload: EntryPayload,
    /// Names of the tags on the entry's virtual anchor, in link order.
    pub tags: Vec<String>,
}

impl EntryRow {
    pub fn kind(&self) -> EntryKind {
        self.payload.kind()
    }

    pub fn tags_text(&self) -> String {
        rt_core::join_tag_names(&self.tags)
    }
}

/// Which driving questions a listing covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionLevel {
    TopLevel,
    ChildrenOf(EntryId),
    All,
}
