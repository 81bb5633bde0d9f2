//! Pure derivation of aggregate counts from a snapshot.
//!
//! Nothing here is ever persisted; stats are recomputed on demand so
//! they cannot go stale relative to the subject/topic state.

use crate::model::{SyllabusSnapshot, TopicStatus};

/// Aggregate counts and overall completion for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyllabusStats {
    pub total_topics: usize,
    pub completed_topics: usize,
    pub in_progress_topics: usize,
    pub not_started_topics: usize,
    /// Integer percentage, round-half-up; 0 for an empty syllabus.
    pub overall_completion: u8,
}

/// Computes stats across all subjects in the snapshot.
///
/// `not_started_topics` is derived by subtraction rather than counted
/// independently, so `completed + in_progress + not_started == total`
/// holds by construction. This derivation must be revisited if
/// `TopicStatus` ever grows a fourth member.
#[must_use]
pub fn compute_stats(snapshot: &SyllabusSnapshot) -> SyllabusStats {
    let mut total_topics = 0;
    let mut completed_topics = 0;
    let mut in_progress_topics = 0;

    for subject in snapshot.subjects() {
        total_topics += subject.topics().len();
        for topic in subject.topics() {
            match topic.status() {
                TopicStatus::Completed => completed_topics += 1,
                TopicStatus::InProgress => in_progress_topics += 1,
                TopicStatus::NotStarted => {}
            }
        }
    }

    SyllabusStats {
        total_topics,
        completed_topics,
        in_progress_topics,
        not_started_topics: total_topics - completed_topics - in_progress_topics,
        overall_completion: completion_percent(completed_topics, total_topics),
    }
}

/// Integer percentage with round-half-up semantics, 0 when `total` is 0.
#[must_use]
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // floor(100 * completed / total + 1/2) in integer arithmetic
    let percent = (completed * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}
