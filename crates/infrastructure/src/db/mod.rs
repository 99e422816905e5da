//! Postgres 连接池与仓储实现

use domain::RepositoryError;
use sqlx::{Pool, Postgres};

pub mod repositories;

pub type DbPool = Pool<Postgres>;

pub struct Db;

impl Db {
    pub async fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, sqlx::Error> {
        sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_size)
            .connect(database_url)
            .await
    }
}

/// sqlx 错误统一换算成存储层错误
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => RepositoryError::Conflict,
        other => RepositoryError::storage(other.to_string()),
    }
}
