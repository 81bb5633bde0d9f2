use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use syllabus_core::model::{
    IconKey, PartitionKey, ProgressLog, Subject, SubjectId, SyllabusSnapshot, Topic, TopicId,
    TopicStatus,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one topic within the subjects record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: TopicId,
    pub name: String,
    pub status: TopicStatus,
}

/// Persisted shape for one subject within the subjects record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub name: String,
    pub icon: String,
    pub topics: Vec<TopicRecord>,
}

/// Persisted shape for one progress-history entry.
///
/// The date serializes as `YYYY-MM-DD`; the field name matches the wire
/// layout of the history record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntryRecord {
    pub date: NaiveDate,
    #[serde(rename = "completedCount")]
    pub completed_count: u32,
}

/// The two logical records persisted for one identity partition.
///
/// This mirrors the domain `SyllabusSnapshot` so repositories can
/// serialize/deserialize without leaking storage concerns into the
/// domain layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub subjects: Vec<SubjectRecord>,
    pub history: Vec<ProgressEntryRecord>,
}

impl SnapshotRecord {
    #[must_use]
    pub fn from_snapshot(snapshot: &SyllabusSnapshot) -> Self {
        let subjects = snapshot
            .subjects()
            .iter()
            .map(|subject| SubjectRecord {
                id: subject.id(),
                name: subject.name().to_owned(),
                icon: subject.icon().as_str().to_owned(),
                topics: subject
                    .topics()
                    .iter()
                    .map(|topic| TopicRecord {
                        id: topic.id(),
                        name: topic.name().to_owned(),
                        status: topic.status(),
                    })
                    .collect(),
            })
            .collect();

        let history = snapshot
            .history()
            .entries()
            .map(|(date, completed_count)| ProgressEntryRecord {
                date,
                completed_count,
            })
            .collect();

        Self { subjects, history }
    }

    /// Convert the record back into a domain snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if a persisted subject or
    /// topic fails domain validation.
    pub fn into_snapshot(self) -> Result<SyllabusSnapshot, StorageError> {
        let mut subjects = Vec::with_capacity(self.subjects.len());
        for record in self.subjects {
            let mut topics = Vec::with_capacity(record.topics.len());
            for topic in record.topics {
                topics.push(
                    Topic::from_persisted(topic.id, topic.name, topic.status)
                        .map_err(|err| StorageError::Serialization(err.to_string()))?,
                );
            }
            subjects.push(
                Subject::from_persisted(record.id, record.name, IconKey::new(record.icon), topics)
                    .map_err(|err| StorageError::Serialization(err.to_string()))?,
            );
        }

        let history = ProgressLog::from_entries(
            self.history
                .into_iter()
                .map(|entry| (entry.date, entry.completed_count)),
        );

        Ok(SyllabusSnapshot::new(subjects, history))
    }
}

/// Persisted shape for a registered user (the local auth collaborator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Repository contract for per-partition syllabus snapshots.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch the snapshot persisted for a partition.
    ///
    /// Returns `Ok(None)` when the partition has no data yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn load_snapshot(
        &self,
        partition: &PartitionKey,
    ) -> Result<Option<SnapshotRecord>, StorageError>;

    /// Durably persist the full snapshot for a partition, replacing
    /// whatever was stored before.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_snapshot(
        &self,
        partition: &PartitionKey,
        record: &SnapshotRecord,
    ) -> Result<(), StorageError>;
}

/// Repository contract for registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already
    /// registered, or other storage errors.
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StorageError>;

    /// Fetch a user by email; `Ok(None)` when unknown.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshots: Arc<Mutex<HashMap<PartitionKey, SnapshotRecord>>>,
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn load_snapshot(
        &self,
        partition: &PartitionKey,
    ) -> Result<Option<SnapshotRecord>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(partition).cloned())
    }

    async fn save_snapshot(
        &self,
        partition: &PartitionKey,
        record: &SnapshotRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(partition.clone(), record.clone());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&user.email) {
            return Err(StorageError::Conflict);
        }
        guard.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(email).cloned())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo);
        Self { snapshots, users }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syllabus_core::model::Identity;

    fn completed_snapshot() -> SyllabusSnapshot {
        let mut snapshot = SyllabusSnapshot::starter();
        let subject_id = snapshot.subjects()[0].id();
        let topic_id = snapshot.subjects()[0].topics()[0].id();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        snapshot.update_topic_status(subject_id, topic_id, TopicStatus::Completed, today);
        snapshot
    }

    #[test]
    fn record_round_trips_snapshot_losslessly() {
        let snapshot = completed_snapshot();
        let record = SnapshotRecord::from_snapshot(&snapshot);
        let restored = record.into_snapshot().unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn record_serializes_wire_field_names() {
        let record = SnapshotRecord::from_snapshot(&completed_snapshot());
        let json = serde_json::to_string(&record.history).unwrap();
        assert!(json.contains("\"completedCount\":1"));
        assert!(json.contains("\"2024-03-15\""));

        let subjects = serde_json::to_string(&record.subjects).unwrap();
        assert!(subjects.contains("\"Completed\""));
        assert!(subjects.contains("\"Not Started\""));
    }

    #[tokio::test]
    async fn in_memory_partitions_are_isolated() {
        let repo = InMemoryRepository::new();
        let guest = PartitionKey::guest();
        let user = PartitionKey::for_identity(&Identity::new("Sid", "sid@example.com"));

        let record = SnapshotRecord::from_snapshot(&completed_snapshot());
        repo.save_snapshot(&user, &record).await.unwrap();

        assert!(repo.load_snapshot(&guest).await.unwrap().is_none());
        assert!(repo.load_snapshot(&user).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_user_insert_is_a_conflict() {
        let repo = InMemoryRepository::new();
        let user = UserRecord {
            name: "Sid".into(),
            email: "sid@example.com".into(),
            password_hash: "abc".into(),
        };
        repo.insert_user(&user).await.unwrap();
        let err = repo.insert_user(&user).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }
}
