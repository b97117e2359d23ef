#![forbid(unsafe_code)]

use crate::entries::EntryKind;
use crate::ids::EntryId;
use serde::{Deserialize, Serialize};

pub const ANCHOR_SUMMARY_MAX_CHARS: usize = 75;
const SUMMARY_ELLIPSIS: &str = "...";

/// What an anchor is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subject", rename_all = "snake_case")]
pub enum AnchorSubject {
    /// A passage the user selected inside a reading.
    Text {
        selected_text: String,
        comment: Option<String>,
    },
    /// A structured entry; exists only while the entry carries at least one tag.
    Virtual {
        entry_id: EntryId,
        kind: EntryKind,
        summary: String,
    },
}

impl AnchorSubject {
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual { .. })
    }

    pub fn display_text(&self) -> &str {
        match self {
            Self::Text { selected_text, .. } => selected_text,
            Self::Virtual { summary, .. } => summary,
        }
    }
}

/// `"Dq: <question>"`, capped at [`ANCHOR_SUMMARY_MAX_CHARS`] characters plus an ellipsis.
/// The source text is used as given, so an empty question yields `"Dq: "`.
pub fn virtual_anchor_summary(kind: EntryKind, source: &str) -> String {
    truncate_summary(&format!("{}: {source}", kind.display_prefix()))
}

pub fn truncate_summary(text: &str) -> String {
    if text.chars().count() <= ANCHOR_SUMMARY_MAX_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(ANCHOR_SUMMARY_MAX_CHARS).collect();
    out.push_str(SUMMARY_ELLIPSIS);
    out
}

/// Stable document key recorded on virtual anchors, e.g. `term_12`.
pub fn virtual_anchor_doc_id(kind: EntryKind, entry_id: EntryId) -> String {
    format!("{}_{}", kind.anchor_item_type(), entry_id.get())
}
