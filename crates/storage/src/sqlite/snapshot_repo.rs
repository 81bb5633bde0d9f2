use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use syllabus_core::model::PartitionKey;

use crate::repository::{
    ProgressEntryRecord, SnapshotRecord, SnapshotRepository, StorageError, SubjectRecord,
};

use super::SqliteRepository;

const SUBJECTS_RECORD: &str = "subjects";
const HISTORY_RECORD: &str = "history";

#[async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn load_snapshot(
        &self,
        partition: &PartitionKey,
    ) -> Result<Option<SnapshotRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT record, payload
            FROM snapshot_records
            WHERE partition = ?1
            ",
        )
        .bind(partition.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut record = SnapshotRecord::default();
        for row in rows {
            let kind: String = row
                .try_get("record")
                .map_err(|err| StorageError::Serialization(err.to_string()))?;
            let payload: String = row
                .try_get("payload")
                .map_err(|err| StorageError::Serialization(err.to_string()))?;

            match kind.as_str() {
                SUBJECTS_RECORD => {
                    record.subjects = serde_json::from_str::<Vec<SubjectRecord>>(&payload)
                        .map_err(|err| StorageError::Serialization(err.to_string()))?;
                }
                HISTORY_RECORD => {
                    record.history = serde_json::from_str::<Vec<ProgressEntryRecord>>(&payload)
                        .map_err(|err| StorageError::Serialization(err.to_string()))?;
                }
                _ => {}
            }
        }

        Ok(Some(record))
    }

    async fn save_snapshot(
        &self,
        partition: &PartitionKey,
        record: &SnapshotRecord,
    ) -> Result<(), StorageError> {
        let subjects = serde_json::to_string(&record.subjects)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let history = serde_json::to_string(&record.history)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        // Both logical records land in one transaction so a partition is
        // never observed half-written.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        for (kind, payload) in [(SUBJECTS_RECORD, subjects), (HISTORY_RECORD, history)] {
            sqlx::query(
                r"
                INSERT INTO snapshot_records (partition, record, payload, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(partition, record) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(partition.as_str())
            .bind(kind)
            .bind(payload)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
