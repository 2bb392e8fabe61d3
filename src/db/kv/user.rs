//! redb UserStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use redb::ReadableTable;

use super::tables::{USERS, blocking, open_read, storage_error};
use crate::db::{
    ConnectionManager, DbError, DbResult, ObjectId, RecordId, STATUS_ACTIVE, User, UserStore,
};

/// Embedded key-value user repository, keyed by email.
pub struct RedbUserStore {
    pub(crate) manager: Arc<ConnectionManager>,
}

#[async_trait]
impl UserStore for RedbUserStore {
    async fn find_by_email(&self, email: &str) -> DbResult<User> {
        let email = email.to_string();

        blocking(&self.manager, move |db| {
            let txn = db.begin_read().map_err(storage_error)?;
            let Some(table) = open_read(&txn, USERS)? else {
                return Err(DbError::NoResult);
            };

            let guard = table
                .get(email.as_str())
                .map_err(storage_error)?
                .ok_or(DbError::NoResult)?;
            Ok(serde_json::from_slice(guard.value())?)
        })
        .await
    }

    async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<User> {
        let now = Utc::now();
        let user = User {
            id: RecordId::Object(ObjectId::new()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            status_id: STATUS_ACTIVE,
            created_at: now,
            updated_at: now,
            deleted: 0,
        };

        blocking(&self.manager, move |db| {
            let bytes = serde_json::to_vec(&user)?;
            let txn = db.begin_write().map_err(storage_error)?;

            let exists = {
                let mut table = txn.open_table(USERS).map_err(storage_error)?;
                let exists = table
                    .get(user.email.as_str())
                    .map_err(storage_error)?
                    .is_some();
                if !exists {
                    table
                        .insert(user.email.as_str(), bytes.as_slice())
                        .map_err(storage_error)?;
                }
                exists
            };

            if exists {
                txn.abort().map_err(storage_error)?;
                return Err(DbError::AlreadyExists {
                    entity_type: "User".to_string(),
                    id: user.email,
                });
            }

            txn.commit().map_err(storage_error)?;
            Ok(user)
        })
        .await
    }
}
