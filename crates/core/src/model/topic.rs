use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::TopicId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic name cannot be empty")]
    EmptyName,
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Completion state of a single studiable unit.
///
/// The serialized names match the persisted record layout
/// (`"Not Started"`, `"In Progress"`, `"Completed"`). Any status may be
/// set from any other status; a forward-only cycle is a presentation
/// convenience, not a rule of this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TopicStatus::NotStarted => "Not Started",
            TopicStatus::InProgress => "In Progress",
            TopicStatus::Completed => "Completed",
        };
        write!(f, "{label}")
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A single studiable unit with a completion status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    name: String,
    status: TopicStatus,
}

impl Topic {
    /// Creates a new topic in the `NotStarted` state.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if name is empty or whitespace-only.
    pub fn new(id: TopicId, name: impl Into<String>) -> Result<Self, TopicError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TopicError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            status: TopicStatus::NotStarted,
        })
    }

    /// Rebuilds a topic from persisted state, preserving its status.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if the persisted name is empty.
    pub fn from_persisted(
        id: TopicId,
        name: impl Into<String>,
        status: TopicStatus,
    ) -> Result<Self, TopicError> {
        let mut topic = Self::new(id, name)?;
        topic.status = status;
        Ok(topic)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> TopicId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn status(&self) -> TopicStatus {
        self.status
    }

    pub fn set_status(&mut self, status: TopicStatus) {
        self.status = status;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
