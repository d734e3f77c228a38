//! Branch (academic track) record.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned branch identifier.
pub type BranchId = i64;

/// Academic track a student may be enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    /// Unique (case-insensitive), never blank.
    pub name: String,
}

impl Branch {
    pub fn new(id: BranchId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison used for lookups and duplicate checks.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Branch [id={}, name={}]", self.id, self.name)
    }
}
