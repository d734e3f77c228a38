//! Event (extracurricular activity) record.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned event identifier.
pub type EventId = i64;

/// Extracurricular activity students may attend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Unique (case-insensitive), never blank.
    pub name: String,
}

impl Event {
    pub fn new(id: EventId, name: impl Into<String>) -> Self {
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

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event [id={}, name={}]", self.id, self.name)
    }
}
