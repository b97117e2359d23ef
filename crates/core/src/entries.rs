#![forbid(unsafe_code)]

//! Structured reading entries.
//!
//! Driving questions, key terms, propositions, theories and arguments share one physical table
//! keyed by a `type` discriminator. In memory each kind carries its own named fields; the
//! column mapping lives in the storage crate.

use crate::ids::{EntryId, OutlineId};
use serde::{Deserialize, Serialize};

/// Discriminator values that belong to a specific kind. Any other value (or NULL) marks an
/// ordinary driving question.
pub const RESERVED_DISCRIMINATORS: [&str; 4] = ["proposition", "term", "theory", "argument"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    DrivingQuestion,
    KeyTerm,
    Proposition,
    Theory,
    Argument,
}

impl EntryKind {
    pub const ALL: [EntryKind; 5] = [
        EntryKind::DrivingQuestion,
        EntryKind::KeyTerm,
        EntryKind::Proposition,
        EntryKind::Theory,
        EntryKind::Argument,
    ];

    /// Stored in the `type` column; driving questions keep their free-form label instead.
    pub fn discriminator(self) -> Option<&'static str> {
        match self {
            Self::DrivingQuestion => None,
            Self::KeyTerm => Some("term"),
            Self::Proposition => Some("proposition"),
            Self::Theory => Some("theory"),
            Self::Argument => Some("argument"),
        }
    }

    pub fn from_discriminator(value: Option<&str>) -> Self {
        match value {
            Some("term") => Self::KeyTerm,
            Some("proposition") => Self::Proposition,
            Some("theory") => Self::Theory,
            Some("argument") => Self::Argument,
            _ => Self::DrivingQuestion,
        }
    }

    /// Short name recorded on virtual anchors (`item_type`).
    pub fn anchor_item_type(self) -> &'static str {
        match self {
            Self::DrivingQuestion => "dq",
            Self::KeyTerm => "term",
            Self::Proposition => "proposition",
            Self::Theory => "theory",
            Self::Argument => "argument",
        }
    }

    pub fn from_anchor_item_type(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.anchor_item_type() == value)
    }

    /// `"dq"` becomes `"Dq"`, `"term"` becomes `"Term"`.
    pub fn display_prefix(self) -> String {
        let raw = self.anchor_item_type();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => {
                let mut out = first.to_uppercase().collect::<String>();
                out.push_str(chars.as_str());
                out
            }
            None => String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrivingQuestion {
    pub parent_id: Option<EntryId>,
    pub question_text: String,
    pub nickname: Option<String>,
    /// Free-form label such as `"Inferred"`; must not collide with a reserved discriminator.
    pub label: Option<String>,
    pub category: Option<String>,
    pub scope: Option<String>,
    pub outline_id: Option<OutlineId>,
    pub pages: Option<String>,
    pub why_question: Option<String>,
    pub is_working_question: bool,
    pub extra_notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub definition: Option<String>,
    pub role: Option<String>,
    pub quote: Option<String>,
    pub outline_id: Option<OutlineId>,
    pub pages: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    pub proposition_text: String,
    pub nickname: Option<String>,
    pub outline_id: Option<OutlineId>,
    pub pages: Option<String>,
    pub why_important: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theory {
    pub name: String,
    pub author: Option<String>,
    pub year: Option<String>,
    pub outline_id: Option<OutlineId>,
    pub pages: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub claim_text: String,
    pub because_text: Option<String>,
    pub driving_question_id: Option<EntryId>,
    pub is_insight: bool,
    pub evidence: Vec<ArgumentEvidence>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentEvidence {
    pub outline_id: Option<OutlineId>,
    pub pages_text: Option<String>,
    pub argument_text: Option<String>,
    pub reading_text: Option<String>,
    pub role_in_argument: Option<String>,
    pub evidence_type: Option<String>,
    pub status: Option<String>,
    pub rationale_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryPayload {
    DrivingQuestion(DrivingQuestion),
    KeyTerm(KeyTerm),
    Proposition(Proposition),
    Theory(Theory),
    Argument(Argument),
}

impl EntryPayload {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::DrivingQuestion(_) => EntryKind::DrivingQuestion,
            Self::KeyTerm(_) => EntryKind::KeyTerm,
            Self::Proposition(_) => EntryKind::Proposition,
            Self::Theory(_) => EntryKind::Theory,
            Self::Argument(_) => EntryKind::Argument,
        }
    }

    /// The field a virtual anchor summary is built from.
    pub fn summary_source(&self) -> &str {
        match self {
            Self::DrivingQuestion(dq) => &dq.question_text,
            Self::KeyTerm(term) => &term.term,
            Self::Proposition(prop) => &prop.proposition_text,
            Self::Theory(theory) => &theory.name,
            Self::Argument(arg) => &arg.claim_text,
        }
    }

    /// Only driving questions nest; every other kind is a flat list per reading.
    pub fn parent_id(&self) -> Option<EntryId> {
        match self {
            Self::DrivingQuestion(dq) => dq.parent_id,
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), EntryError> {
        let Self::DrivingQuestion(dq) = self else {
            return Ok(());
        };
        match dq.label.as_deref() {
            Some(label) if RESERVED_DISCRIMINATORS.contains(&label.trim()) => {
                Err(EntryError::ReservedLabel)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryError {
    ReservedLabel,
}

impl EntryError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ReservedLabel => "driving question label collides with a reserved entry type",
        }
    }
}
