#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("field `{field}` cannot be updated by name")]
    InvalidField { field: String },
    #[error("tag name `{name}` is already used by tag {existing_id}")]
    TagNameConflict { name: String, existing_id: i64 },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{entity} {id} was not readable after insert")]
    InsertVerification { entity: &'static str, id: i64 },
    #[error("ordering must list every sibling exactly once (expected {expected}, got {given})")]
    IncompleteOrdering { expected: usize, given: usize },
    #[error("entry {id} is not a {expected}")]
    KindMismatch { id: i64, expected: &'static str },
}

impl StoreError {
    pub(in crate::store) fn not_found(entity: &'static str, id: impl Into<i64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Integrity conflicts and lookups the caller can act on, as opposed to storage faults.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidField { .. }
                | Self::TagNameConflict { .. }
                | Self::NotFound { .. }
                | Self::IncompleteOrdering { .. }
                | Self::KindMismatch { .. }
        )
    }
}

impl From<rt_core::TagNameError> for StoreError {
    fn from(value: rt_core::TagNameError) -> Self {
        Self::InvalidInput(value.message())
    }
}

impl From<rt_core::EntryError> for StoreError {
    fn from(value: rt_core::EntryError) -> Self {
        Self::InvalidInput(value.message())
    }
}
