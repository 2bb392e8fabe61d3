//! SQLite UserStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::helpers::{UserRow, map_sqlx_error};
use crate::db::{
    ConnectionManager, DbError, DbResult, RecordId, STATUS_ACTIVE, User, UserStore,
};

/// SQLx-backed user repository.
pub struct SqliteUserStore {
    pub(crate) manager: Arc<ConnectionManager>,
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> DbResult<User> {
        let pool = self.manager.sql().await?;

        let row: UserRow = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email, password, status_id,
                   created_at, updated_at, deleted
            FROM user WHERE email = ? LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_one(&pool)
        .await
        .map_err(map_sqlx_error)?;

        row.try_into()
    }

    async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<User> {
        let pool = self.manager.sql().await?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO user (first_name, last_name, email, password, status_id,
                              created_at, updated_at, deleted)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .bind(i64::from(STATUS_ACTIVE))
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DbError::AlreadyExists {
                    entity_type: "User".to_string(),
                    id: email.to_string(),
                }
            }
            other => map_sqlx_error(other),
        })?;

        Ok(User {
            id: RecordId::Int(result.last_insert_rowid()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            status_id: STATUS_ACTIVE,
            created_at: now,
            updated_at: now,
            deleted: 0,
        })
    }
}
