#![forbid(unsafe_code)]

use rt_core::{ItemId, ItemKind, ProjectTextField};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub id: ItemId,
    pub parent_id: Option<ItemId>,
    pub kind: ItemKind,
    pub name: String,
    pub display_order: i64,
    pub is_assignment: bool,
    pub purpose: Option<String>,
    pub goals: Option<String>,
    pub key_questions: Option<String>,
    pub thesis: Option<String>,
    pub insights: Option<String>,
    pub unresolved: Option<String>,
    pub assignment_instructions: Option<String>,
    pub assignment_draft: Option<String>,
    pub synthesis_notes: Option<String>,
}

impl ItemRow {
    pub fn text(&self, field: ProjectTextField) -> Option<&str> {
        let value = match field {
            ProjectTextField::Purpose => &self.purpose,
            ProjectTextField::Goals => &self.goals,
            ProjectTextField::KeyQuestions => &self.key_questions,
            ProjectTextField::Thesis => &self.thesis,
            ProjectTextField::Insights => &self.insights,
            ProjectTextField::Unresolved => &self.unresolved,
            ProjectTextField::AssignmentInstructions => &self.assignment_instructions,
            ProjectTextField::AssignmentDraft => &self.assignment_draft,
            ProjectTextField::SynthesisNotes => &self.synthesis_notes,
        };
        value.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub kind: ItemKind,
    pub parent_id: Option<ItemId>,
    pub is_assignment: bool,
}

impl NewItem {
    pub fn project(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Project,
            parent_id: None,
            is_assignment: false,
        }
    }

    pub fn under(mut self, parent_id: ItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}
