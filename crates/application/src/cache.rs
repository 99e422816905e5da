//! 聊天室列表缓存端口
//!
//! 缓存只由列表读取路径填充；任何改变聊天室集合的写入都删除缓存项，
//! 下一次读取从存储重新计算。

use async_trait::async_trait;
use domain::Chatroom;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait ChatroomCache: Send + Sync {
    /// 读取缓存的列表快照，未命中返回 None
    async fn get(&self, user_id: Uuid) -> Result<Option<Vec<Chatroom>>, CacheError>;

    /// 写入列表快照，带 TTL
    async fn put(
        &self,
        user_id: Uuid,
        chatrooms: &[Chatroom],
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// 无条件删除缓存项（不做刷新）
    async fn invalidate(&self, user_id: Uuid) -> Result<(), CacheError>;
}
