#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Project,
    Class,
    Folder,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Class => "class",
            Self::Folder => "folder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "project" => Some(Self::Project),
            "class" => Some(Self::Class),
            "folder" => Some(Self::Folder),
            _ => None,
        }
    }
}

/// Order value for a row appended after the current maximum (`-1` when the scope is empty).
pub fn next_display_order(current_max: Option<i64>) -> i64 {
    current_max.unwrap_or(-1) + 1
}
