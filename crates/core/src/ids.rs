#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// A node in the project/class/folder hierarchy.
    ItemId
);
row_id!(ReadingId);
row_id!(OutlineId);
row_id!(
    /// A row of the shared driving-question table (questions, terms, propositions, theories,
    /// arguments).
    EntryId
);
row_id!(EvidenceId);
row_id!(TagId);
row_id!(AnchorId);
row_id!(RubricId);
row_id!(AttachmentId);
row_id!(TodoId);
row_id!(
    /// A project-level term with its meaning across readings.
    TerminologyId
);
row_id!(ProjectPropositionId);
row_id!(
    /// A reference row of a terminology or project-proposition entry.
    ReferenceId
);
