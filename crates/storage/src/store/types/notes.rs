#![forbid(unsafe_code)]

use rt_core::{ItemId, OutlineId, ProjectPropositionId, ReadingId, ReferenceId, TerminologyId};
use serde::Serialize;

/// Whether a project note occurs in one reading at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReadingStatus {
    pub reading_id: ReadingId,
    pub not_in_reading: bool,
}

/// Where a reading treats a term or proposition. `addressed` describes how the author
/// addresses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteReference {
    pub reading_id: ReadingId,
    pub outline_id: Option<OutlineId>,
    pub page_number: Option<String>,
    pub addressed: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NoteReferenceRow {
    pub id: ReferenceId,
    pub reading_id: ReadingId,
    pub outline_id: Option<OutlineId>,
    pub section_title: Option<String>,
    pub page_number: Option<String>,
    pub addressed: Option<String>,
    pub notes: Option<String>,
}

/// Full content of a terminology entry. Saving replaces every reference; statuses are upserted
/// per reading, and references into readings marked `not_in_reading` are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TermDraft {
    pub term: String,
    pub meaning: Option<String>,
    pub statuses: Vec<ReadingStatus>,
    pub references: Vec<NoteReference>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TermSummary {
    pub id: TerminologyId,
    pub term: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TermDetails {
    pub id: TerminologyId,
    pub project_id: ItemId,
    pub term: String,
    pub meaning: Option<String>,
    pub display_order: i64,
    pub statuses: Vec<ReadingStatus>,
    pub references: Vec<NoteReferenceRow>,
}

/// Same save rules as [`TermDraft`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectPropositionDraft {
    pub display_name: String,
    pub proposition_html: Option<String>,
    pub statuses: Vec<ReadingStatus>,
    pub references: Vec<NoteReference>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectPropositionSummary {
    pub id: ProjectPropositionId,
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectPropositionDetails {
    pub id: ProjectPropositionId,
    pub project_id: ItemId,
    pub display_name: String,
    pub proposition_html: Option<String>,
    pub display_order: i64,
    pub statuses: Vec<ReadingStatus>,
    pub references: Vec<NoteReferenceRow>,
}
