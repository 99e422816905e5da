//! 用户仓储的 Postgres 实现

use crate::db::{map_sqlx_error, DbPool};
use application::UserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{RepositoryError, User};
use sqlx::{query_as, FromRow};
use std::sync::Arc;
use uuid::Uuid;

/// 数据库用户行
#[derive(Debug, Clone, FromRow)]
struct DbUser {
    id: Uuid,
    mobile_number: String,
    password_hash: Option<String>,
    otp_secret: Option<String>,
    otp_expiry: Option<DateTime<Utc>>,
    is_pro: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            mobile_number: row.mobile_number,
            password_hash: row.password_hash,
            otp_secret: row.otp_secret,
            otp_expiry: row.otp_expiry,
            is_pro: row.is_pro,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgUserRepository {
    pool: Arc<DbPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let row = query_as::<_, DbUser>(
            r#"INSERT INTO users
                   (id, mobile_number, password_hash, otp_secret, otp_expiry, is_pro,
                    created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, mobile_number, password_hash, otp_secret, otp_expiry, is_pro,
                         created_at, updated_at"#,
        )
        .bind(user.id)
        .bind(&user.mobile_number)
        .bind(&user.password_hash)
        .bind(&user.otp_secret)
        .bind(user.otp_expiry)
        .bind(user.is_pro)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, user: User) -> Result<User, RepositoryError> {
        let row = query_as::<_, DbUser>(
            r#"UPDATE users
               SET password_hash = $2, otp_secret = $3, otp_expiry = $4, is_pro = $5,
                   updated_at = $6
               WHERE id = $1
               RETURNING id, mobile_number, password_hash, otp_secret, otp_expiry, is_pro,
                         created_at, updated_at"#,
        )
        .bind(user.id)
        .bind(&user.password_hash)
        .bind(&user.otp_secret)
        .bind(user.otp_expiry)
        .bind(user.is_pro)
        .bind(user.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let row = query_as::<_, DbUser>(
            r#"SELECT id, mobile_number, password_hash, otp_secret, otp_expiry, is_pro,
                      created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_mobile_number(
        &self,
        mobile_number: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = query_as::<_, DbUser>(
            r#"SELECT id, mobile_number, password_hash, otp_secret, otp_expiry, is_pro,
                      created_at, updated_at
               FROM users WHERE mobile_number = $1"#,
        )
        .bind(mobile_number)
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }
}
