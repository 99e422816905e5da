//! 聊天室仓储的 Postgres 实现

use crate::db::{map_sqlx_error, DbPool};
use application::ChatroomRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Chatroom, RepositoryError};
use sqlx::{query, query_as, FromRow};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
struct DbChatroom {
    id: Uuid,
    user_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DbChatroom> for Chatroom {
    fn from(row: DbChatroom) -> Self {
        Chatroom {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgChatroomRepository {
    pool: Arc<DbPool>,
}

impl PgChatroomRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatroomRepository for PgChatroomRepository {
    async fn create(&self, chatroom: Chatroom) -> Result<Chatroom, RepositoryError> {
        let row = query_as::<_, DbChatroom>(
            r#"INSERT INTO chatrooms (id, user_id, name, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, user_id, name, created_at, updated_at"#,
        )
        .bind(chatroom.id)
        .bind(chatroom.user_id)
        .bind(&chatroom.name)
        .bind(chatroom.created_at)
        .bind(chatroom.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chatroom>, RepositoryError> {
        let row = query_as::<_, DbChatroom>(
            r#"SELECT id, user_id, name, created_at, updated_at
               FROM chatrooms WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Chatroom>, RepositoryError> {
        let rows = query_as::<_, DbChatroom>(
            r#"SELECT id, user_id, name, created_at, updated_at
               FROM chatrooms WHERE user_id = $1
               ORDER BY created_at ASC"#,
        )
        .bind(owner_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn touch(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        let result = query("UPDATE chatrooms SET updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(now)
            .execute(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
