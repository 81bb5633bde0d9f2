use std::sync::Arc;

use tracing::{debug, warn};

use storage::repository::{SnapshotRecord, SnapshotRepository};
use syllabus_core::model::{
    IconKey, Identity, PartitionKey, ProgressLog, Subject, SubjectId, SyllabusSnapshot, Topic,
    TopicId, TopicStatus,
};
use syllabus_core::stats::{self, SyllabusStats};
use syllabus_core::trend::{self, TrendBucket, TrendPeriod};

use crate::Clock;
use crate::error::SyllabusServiceError;

/// The single write path into the study-progress state.
///
/// Owns the in-memory snapshot for the active identity partition and
/// keeps it durable on a best-effort basis: every mutation applies in
/// memory first, and a failed save is reported to the diagnostic sink
/// without interrupting the session. The in-memory snapshot stays
/// authoritative either way.
pub struct SyllabusService {
    clock: Clock,
    snapshots: Arc<dyn SnapshotRepository>,
    partition: PartitionKey,
    snapshot: SyllabusSnapshot,
}

impl SyllabusService {
    /// Load the snapshot for the given identity (guest when `None`).
    ///
    /// A missing or unreadable partition degrades to the starter
    /// syllabus; this constructor never fails the caller.
    pub async fn load(
        clock: Clock,
        snapshots: Arc<dyn SnapshotRepository>,
        identity: Option<&Identity>,
    ) -> Self {
        let partition = PartitionKey::from_active(identity);
        let snapshot = read_partition(snapshots.as_ref(), &partition).await;
        Self {
            clock,
            snapshots,
            partition,
            snapshot,
        }
    }

    /// Discard the in-memory snapshot and load the partition for a new
    /// identity. This is the only path that swaps the state wholesale.
    pub async fn switch_identity(&mut self, identity: Option<&Identity>) {
        self.partition = PartitionKey::from_active(identity);
        self.snapshot = read_partition(self.snapshots.as_ref(), &self.partition).await;
    }

    // Accessors
    #[must_use]
    pub fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    #[must_use]
    pub fn snapshot(&self) -> &SyllabusSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        self.snapshot.subjects()
    }

    #[must_use]
    pub fn history(&self) -> &ProgressLog {
        self.snapshot.history()
    }

    /// Aggregate counts derived from the current snapshot.
    #[must_use]
    pub fn stats(&self) -> SyllabusStats {
        stats::compute_stats(&self.snapshot)
    }

    /// Time-bucketed completion counts for the trend chart, relative to
    /// the clock's current date.
    #[must_use]
    pub fn trend(&self, period: TrendPeriod) -> Vec<TrendBucket> {
        trend::aggregate(self.snapshot.history(), period, self.clock.today())
    }

    /// Append a new subject with a fresh id and an empty topic list.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` for a blank name; any icon key
    /// is accepted (unknown keys degrade to the default icon on display).
    pub async fn add_subject(
        &mut self,
        name: &str,
        icon: IconKey,
    ) -> Result<SubjectId, SyllabusServiceError> {
        let subject = Subject::new(SubjectId::new_random(), name, icon)?;
        let id = subject.id();
        self.snapshot.add_subject(subject);
        self.persist().await;
        Ok(id)
    }

    /// Append a `NotStarted` topic to a subject, preserving order.
    ///
    /// Returns `Ok(None)` when the subject id is unknown: the snapshot
    /// is left untouched and nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` for a blank name.
    pub async fn add_topic(
        &mut self,
        subject_id: SubjectId,
        name: &str,
    ) -> Result<Option<TopicId>, SyllabusServiceError> {
        let topic = Topic::new(TopicId::new_random(), name)?;
        let id = topic.id();
        if self.snapshot.add_topic(subject_id, topic) {
            self.persist().await;
            Ok(Some(id))
        } else {
            debug!(%subject_id, "add_topic: unknown subject, no-op");
            Ok(None)
        }
    }

    /// Remove a topic from a subject.
    ///
    /// Historical log entries are never adjusted: the log records
    /// point-in-time transitions, not current composition. Returns
    /// whether a topic was actually removed; unknown ids are a no-op.
    pub async fn delete_topic(&mut self, subject_id: SubjectId, topic_id: TopicId) -> bool {
        if self.snapshot.delete_topic(subject_id, topic_id) {
            self.persist().await;
            true
        } else {
            debug!(%subject_id, %topic_id, "delete_topic: nothing to remove");
            false
        }
    }

    /// Set a topic's status and attribute the net completion change to
    /// today's progress-log entry.
    ///
    /// Any target status is accepted from any current status. Returns
    /// whether anything changed; setting the current status again or
    /// naming unknown ids leaves both the subjects and the log untouched
    /// and persists nothing.
    pub async fn update_topic_status(
        &mut self,
        subject_id: SubjectId,
        topic_id: TopicId,
        new_status: TopicStatus,
    ) -> bool {
        let today = self.clock.today();
        if self
            .snapshot
            .update_topic_status(subject_id, topic_id, new_status, today)
        {
            self.persist().await;
            true
        } else {
            false
        }
    }

    async fn persist(&self) {
        let record = SnapshotRecord::from_snapshot(&self.snapshot);
        if let Err(err) = self.snapshots.save_snapshot(&self.partition, &record).await {
            // In-memory state stays authoritative for the session.
            warn!(partition = %self.partition, error = %err, "snapshot save failed");
        }
    }
}

async fn read_partition(
    snapshots: &dyn SnapshotRepository,
    partition: &PartitionKey,
) -> SyllabusSnapshot {
    match snapshots.load_snapshot(partition).await {
        Ok(Some(record)) => match record.into_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(partition = %partition, error = %err, "discarding unreadable snapshot, using starter data");
                SyllabusSnapshot::starter()
            }
        },
        Ok(None) => SyllabusSnapshot::starter(),
        Err(err) => {
            warn!(partition = %partition, error = %err, "snapshot load failed, using starter data");
            SyllabusSnapshot::starter()
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
