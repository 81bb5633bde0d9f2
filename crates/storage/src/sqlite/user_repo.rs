use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{StorageError, UserRecord, UserRepository};

use super::SqliteRepository;

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        let result = sqlx::query(
            r"
            INSERT INTO users (email, name, password_hash)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StorageError::Conflict)
            }
            Err(err) => Err(StorageError::Connection(err.to_string())),
        }
    }

    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT email, name, password_hash
            FROM users
            WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let email: String = row
            .try_get("email")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let name: String = row
            .try_get("name")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(UserRecord {
            name,
            email,
            password_hash,
        }))
    }
}
