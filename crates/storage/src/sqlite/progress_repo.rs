use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{PROGRESS_KEY, ProgressRecord, ProgressRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT payload
            FROM progress_records
            WHERE key = ?1
            ",
        )
        .bind(PROGRESS_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row
            .try_get("payload")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let record = serde_json::from_str(&payload)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        tracing::debug!(bytes = payload.len(), "progress record loaded");
        Ok(Some(record))
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let payload = serde_json::to_string(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO progress_records (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(PROGRESS_KEY)
        .bind(&payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        tracing::debug!(bytes = payload.len(), "progress record saved");
        Ok(())
    }
}
