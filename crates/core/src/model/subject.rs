use thiserror::Error;

use crate::model::icon::IconKey;
use crate::model::ids::{SubjectId, TopicId};
use crate::model::topic::{Topic, TopicStatus};
use crate::stats::completion_percent;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("subject name cannot be empty")]
    EmptyName,
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A top-level study category owning an ordered list of topics.
///
/// Topic insertion order is preserved; a subject owns its topics
/// exclusively, so removing the subject would take its topics with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    name: String,
    icon: IconKey,
    topics: Vec<Topic>,
}

impl Subject {
    /// Creates a new subject with an empty topic list.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` if name is empty or whitespace-only.
    pub fn new(id: SubjectId, name: impl Into<String>, icon: IconKey) -> Result<Self, SubjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            icon,
            topics: Vec::new(),
        })
    }

    /// Rebuilds a subject from persisted state, preserving topic order.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` if the persisted name is empty.
    pub fn from_persisted(
        id: SubjectId,
        name: impl Into<String>,
        icon: IconKey,
        topics: Vec<Topic>,
    ) -> Result<Self, SubjectError> {
        let mut subject = Self::new(id, name, icon)?;
        subject.topics = topics;
        Ok(subject)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn icon(&self) -> &IconKey {
        &self.icon
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id() == id)
    }

    pub(crate) fn topic_mut(&mut self, id: TopicId) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|topic| topic.id() == id)
    }

    /// Appends a topic at the end of the list.
    pub fn push_topic(&mut self, topic: Topic) {
        self.topics.push(topic);
    }

    /// Removes a topic by id, keeping the order of the rest.
    ///
    /// Returns the removed topic, or `None` if the id is unknown.
    pub fn remove_topic(&mut self, id: TopicId) -> Option<Topic> {
        let index = self.topics.iter().position(|topic| topic.id() == id)?;
        Some(self.topics.remove(index))
    }

    /// Integer completion percentage for this subject alone (0 when the
    /// subject has no topics).
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        let completed = self
            .topics
            .iter()
            .filter(|topic| topic.status() == TopicStatus::Completed)
            .count();
        completion_percent(completed, self.topics.len())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
