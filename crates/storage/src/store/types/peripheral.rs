#![forbid(unsafe_code)]

use rt_core::{AttachmentId, ItemId, ReadingId, RubricId, TodoId};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RubricRow {
    pub id: RubricId,
    pub project_id: ItemId,
    pub component_text: String,
    pub is_checked: bool,
    pub display_order: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttachmentRow {
    pub id: AttachmentId,
    pub reading_id: ReadingId,
    pub display_name: String,
    pub file_path: String,
    pub display_order: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TodoRow {
    pub id: TodoId,
    pub project_id: ItemId,
    pub display_name: String,
    pub task_html: Option<String>,
    pub notes_html: Option<String>,
    pub is_checked: bool,
    pub display_order: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoContent {
    pub display_name: String,
    pub task_html: Option<String>,
    pub notes_html: Option<String>,
}
