//! SurrealDB UserStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::codec::{USER_TABLE, UserDoc, timed};
use crate::db::{ConnectionManager, DbError, DbResult, ObjectId, STATUS_ACTIVE, User, UserStore};

/// Document-store user repository.
pub struct SurrealUserStore {
    pub(crate) manager: Arc<ConnectionManager>,
}

impl SurrealUserStore {
    async fn find_doc(&self, email: &str) -> DbResult<Option<UserDoc>> {
        let db = self.manager.document().await?;

        let mut response = timed(
            db.query("SELECT * FROM type::table($table) WHERE email = $email LIMIT 1")
                .bind(("table", USER_TABLE))
                .bind(("email", email.to_owned())),
        )
        .await?;

        let docs: Vec<UserDoc> = response.take(0).map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;
        Ok(docs.into_iter().next())
    }
}

#[async_trait]
impl UserStore for SurrealUserStore {
    async fn find_by_email(&self, email: &str) -> DbResult<User> {
        self.find_doc(email)
            .await?
            .ok_or(DbError::NoResult)?
            .try_into()
    }

    async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<User> {
        // The unique index rejects races; this check gives the clean error.
        if self.find_doc(email).await?.is_some() {
            return Err(DbError::AlreadyExists {
                entity_type: "User".to_string(),
                id: email.to_string(),
            });
        }

        let db = self.manager.document().await?;
        let oid = ObjectId::new();
        let now = Utc::now();
        let doc = UserDoc {
            oid: oid.to_hex(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            status_id: STATUS_ACTIVE,
            created_at: now,
            updated_at: now,
            deleted: 0,
        };

        let created: Option<UserDoc> =
            timed(db.create((USER_TABLE, oid.to_hex())).content(doc)).await?;

        created
            .ok_or_else(|| DbError::Database {
                message: "create returned no user record".to_string(),
            })?
            .try_into()
    }
}
