//! 消息仓储的 Postgres 实现
//!
//! `gemini_response` 为 NULL 表示回复待生成；含失败标记的文本表示
//! 生成失败。清理语句同时覆盖这两种情况。

use crate::db::{map_sqlx_error, DbPool};
use application::MessageRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Message, RepositoryError, GEMINI_ERROR_MARKER};
use sqlx::{query, query_as, query_scalar, FromRow};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
struct DbMessage {
    id: Uuid,
    chatroom_id: Uuid,
    user_id: Uuid,
    content: String,
    gemini_response: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DbMessage> for Message {
    fn from(row: DbMessage) -> Self {
        Message {
            id: row.id,
            chatroom_id: row.chatroom_id,
            user_id: row.user_id,
            content: row.content,
            gemini_response: row.gemini_response,
            created_at: row.created_at,
        }
    }
}

pub struct PgMessageRepository {
    pool: Arc<DbPool>,
}

impl PgMessageRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        let row = query_as::<_, DbMessage>(
            r#"INSERT INTO messages (id, chatroom_id, user_id, content, gemini_response, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, chatroom_id, user_id, content, gemini_response, created_at"#,
        )
        .bind(message.id)
        .bind(message.chatroom_id)
        .bind(message.user_id)
        .bind(&message.content)
        .bind(&message.gemini_response)
        .bind(message.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, RepositoryError> {
        let row = query_as::<_, DbMessage>(
            r#"SELECT id, chatroom_id, user_id, content, gemini_response, created_at
               FROM messages WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_by_chatroom(&self, chatroom_id: Uuid) -> Result<Vec<Message>, RepositoryError> {
        let rows = query_as::<_, DbMessage>(
            r#"SELECT id, chatroom_id, user_id, content, gemini_response, created_at
               FROM messages WHERE chatroom_id = $1
               ORDER BY created_at ASC"#,
        )
        .bind(chatroom_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_authored_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        // 命中 (user_id, created_at) 索引
        query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM messages
               WHERE user_id = $1 AND created_at >= $2 AND created_at < $3"#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&*self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn set_gemini_response(
        &self,
        id: Uuid,
        response: &str,
    ) -> Result<bool, RepositoryError> {
        let result = query("UPDATE messages SET gemini_response = $2 WHERE id = $1")
            .bind(id)
            .bind(response)
            .execute(&*self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_failed_by_author(&self, user_id: Uuid) -> Result<u64, RepositoryError> {
        let pattern = format!("%{}%", GEMINI_ERROR_MARKER);
        let result = query(
            r#"DELETE FROM messages
               WHERE user_id = $1
                 AND (gemini_response IS NULL OR gemini_response ILIKE $2)"#,
        )
        .bind(user_id)
        .bind(&pattern)
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
