#![forbid(unsafe_code)]

use rt_core::{EntryId, ItemId, OutlineId, ReadingId};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReadingRow {
    pub id: ReadingId,
    pub project_id: ItemId,
    pub title: String,
    pub author: Option<String>,
    pub nickname: Option<String>,
    pub display_order: i64,
    pub zotero_item_key: Option<String>,
    pub published: Option<String>,
    pub pages: Option<String>,
    pub assignment: Option<String>,
    pub level: Option<String>,
    pub classification: Option<String>,
    pub reading_notes_text: Option<String>,
    pub propositions_html: Option<String>,
    pub unity_html: Option<String>,
    pub key_terms_html: Option<String>,
    pub arguments_html: Option<String>,
    pub gaps_html: Option<String>,
    pub theories_html: Option<String>,
    pub personal_dialogue_html: Option<String>,
    pub elevator_abstract_html: Option<String>,
    pub unity_kind_of_work: Option<String>,
    pub unity_driving_question_id: Option<EntryId>,
}

impl ReadingRow {
    /// Nickname when set, title otherwise.
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nickname) if !nickname.trim().is_empty() => nickname,
            _ => &self.title,
        }
    }
}

/// Bibliographic fields shared by insert, detail update and duplication.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadingDetails {
    pub title: String,
    pub author: String,
    pub nickname: String,
    pub published: String,
    pub pages: String,
    pub assignment: String,
    pub level: String,
    pub classification: String,
    pub zotero_item_key: Option<String>,
}

impl ReadingDetails {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub(in crate::store) fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            nickname: self.nickname.trim().to_string(),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutlineRow {
    pub id: OutlineId,
    pub reading_id: ReadingId,
    pub parent_id: Option<OutlineId>,
    pub section_title: String,
    pub notes_html: Option<String>,
    pub display_order: i64,
    pub part: PartData,
}

/// Relational fields of an outline section used as a structural part.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartData {
    pub function_text: String,
    pub relation_text: String,
    pub dependency_text: String,
    pub is_structural: bool,
    pub driving_question_id: Option<EntryId>,
}
