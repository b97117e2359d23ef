#![forbid(unsafe_code)]

use rt_core::{AnchorId, EntryId, EntryKind, ItemId, ReadingId, TagId};
use serde::Serialize;

use super::TagRow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphReading {
    pub id: ReadingId,
    pub title: String,
    pub author: Option<String>,
    /// Nickname when non-empty, title otherwise.
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReadingTagEdge {
    pub reading_id: ReadingId,
    pub tag_id: TagId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectGraph {
    pub readings: Vec<GraphReading>,
    pub tags: Vec<TagRow>,
    pub edges: Vec<ReadingTagEdge>,
}

/// One (virtual anchor, tag) pair; `tag_id` is `None` only for an anchor without links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VirtualAnchorEdge {
    pub anchor_id: AnchorId,
    pub reading_id: ReadingId,
    pub tag_id: Option<TagId>,
    pub item_link_id: EntryId,
    pub kind: EntryKind,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectGraphFull {
    pub readings: Vec<GraphReading>,
    pub tags: Vec<TagRow>,
    pub edges: Vec<ReadingTagEdge>,
    pub virtual_anchors: Vec<VirtualAnchorEdge>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GlobalTag {
    pub id: TagId,
    pub name: String,
    pub project_count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphProject {
    pub id: ItemId,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProjectTagEdge {
    pub project_id: ItemId,
    pub tag_id: TagId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GlobalGraph {
    pub tags: Vec<GlobalTag>,
    pub projects: Vec<GraphProject>,
    pub edges: Vec<ProjectTagEdge>,
}
