#![forbid(unsafe_code)]

use rt_core::TagId;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TagRow {
    pub id: TagId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagCountRow {
    pub id: TagId,
    pub name: String,
    pub anchor_count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagMergeReport {
    pub source: TagId,
    pub target: TagRow,
    pub anchors_relinked: usize,
    pub duplicate_links_dropped: usize,
}
