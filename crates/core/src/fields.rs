#![forbid(unsafe_code)]

//! Whitelisted rich-text columns that callers may update by name.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectTextField {
    Purpose,
    Goals,
    KeyQuestions,
    Thesis,
    Insights,
    Unresolved,
    AssignmentInstructions,
    AssignmentDraft,
    SynthesisNotes,
}

impl ProjectTextField {
    pub const ALL: [ProjectTextField; 9] = [
        ProjectTextField::Purpose,
        ProjectTextField::Goals,
        ProjectTextField::KeyQuestions,
        ProjectTextField::Thesis,
        ProjectTextField::Insights,
        ProjectTextField::Unresolved,
        ProjectTextField::AssignmentInstructions,
        ProjectTextField::AssignmentDraft,
        ProjectTextField::SynthesisNotes,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Self::Purpose => "project_purpose_text",
            Self::Goals => "project_goals_text",
            Self::KeyQuestions => "key_questions_text",
            Self::Thesis => "thesis_text",
            Self::Insights => "insights_text",
            Self::Unresolved => "unresolved_text",
            Self::AssignmentInstructions => "assignment_instructions_text",
            Self::AssignmentDraft => "assignment_draft_text",
            Self::SynthesisNotes => "synthesis_notes_html",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingTextField {
    ReadingNotes,
    Propositions,
    Unity,
    KeyTerms,
    Arguments,
    Gaps,
    Theories,
    PersonalDialogue,
    ElevatorAbstract,
}

impl ReadingTextField {
    pub const ALL: [ReadingTextField; 9] = [
        ReadingTextField::ReadingNotes,
        ReadingTextField::Propositions,
        ReadingTextField::Unity,
        ReadingTextField::KeyTerms,
        ReadingTextField::Arguments,
        ReadingTextField::Gaps,
        ReadingTextField::Theories,
        ReadingTextField::PersonalDialogue,
        ReadingTextField::ElevatorAbstract,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Self::ReadingNotes => "reading_notes_text",
            Self::Propositions => "propositions_html",
            Self::Unity => "unity_html",
            Self::KeyTerms => "key_terms_html",
            Self::Arguments => "arguments_html",
            Self::Gaps => "gaps_html",
            Self::Theories => "theories_html",
            Self::PersonalDialogue => "personal_dialogue_html",
            Self::ElevatorAbstract => "elevator_abstract_html",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == name)
    }
}

/// Per-project instruction columns, in storage order.
pub const INSTRUCTION_COLUMNS: [&str; 18] = [
    "key_questions_instr",
    "thesis_instr",
    "insights_instr",
    "unresolved_instr",
    "synthesis_terminology_instr",
    "synthesis_propositions_instr",
    "synthesis_notes_instr",
    "reading_dq_instr",
    "reading_lp_instr",
    "reading_unity_instr",
    "reading_elevator_instr",
    "reading_parts_instr",
    "reading_key_terms_instr",
    "reading_arguments_instr",
    "reading_gaps_instr",
    "reading_theories_instr",
    "reading_dialogue_instr",
    "reading_rules_html",
];

pub fn is_instruction_column(name: &str) -> bool {
    INSTRUCTION_COLUMNS.contains(&name)
}
