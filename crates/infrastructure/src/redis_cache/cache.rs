//! 聊天室列表的 Redis 读缓存
//!
//! 写路径只做删除，读路径负责回填。键空间按用户划分，
//! 单个键失效不影响其他用户。

use application::{CacheError, ChatroomCache};
use async_trait::async_trait;
use domain::Chatroom;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::redis_cache::RedisCacheError;

/// Redis 聊天室缓存
pub struct RedisChatroomCache {
    connection: ConnectionManager,
}

impl RedisChatroomCache {
    /// 建立连接管理器，断线后由其自动重连
    pub async fn new(redis_url: &str) -> Result<Self, RedisCacheError> {
        let client = redis::Client::open(redis_url).map_err(|e| RedisCacheError::ConfigError {
            message: format!("创建 Redis 客户端失败: {}", e),
        })?;
        let connection = client.get_connection_manager().await?;

        info!("Redis 缓存连接成功");
        Ok(Self { connection })
    }

    fn cache_key(user_id: Uuid) -> String {
        format!("chatrooms:{}", user_id)
    }
}

#[async_trait]
impl ChatroomCache for RedisChatroomCache {
    async fn get(&self, user_id: Uuid) -> Result<Option<Vec<Chatroom>>, CacheError> {
        let key = Self::cache_key(user_id);
        let mut conn = self.connection.clone();

        let payload: Option<String> = conn
            .get(&key)
            .await
            .map_err(RedisCacheError::from)
            .map_err(CacheError::from)?;

        match payload {
            Some(json) => {
                let chatrooms: Vec<Chatroom> = serde_json::from_str(&json)
                    .map_err(RedisCacheError::from)
                    .map_err(CacheError::from)?;
                debug!(%user_id, count = chatrooms.len(), "chatroom cache hit");
                Ok(Some(chatrooms))
            }
            None => {
                debug!(%user_id, "chatroom cache miss");
                Ok(None)
            }
        }
    }

    async fn put(
        &self,
        user_id: Uuid,
        chatrooms: &[Chatroom],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let key = Self::cache_key(user_id);
        let payload = serde_json::to_string(chatrooms)
            .map_err(RedisCacheError::from)
            .map_err(CacheError::from)?;

        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(&key, payload, ttl.as_secs())
            .await
            .map_err(RedisCacheError::from)
            .map_err(CacheError::from)?;

        debug!(%user_id, ttl_secs = ttl.as_secs(), "chatroom cache populated");
        Ok(())
    }

    async fn invalidate(&self, user_id: Uuid) -> Result<(), CacheError> {
        let key = Self::cache_key(user_id);
        let mut conn = self.connection.clone();

        conn.del::<_, ()>(&key)
            .await
            .map_err(RedisCacheError::from)
            .map_err(CacheError::from)?;

        debug!(%user_id, "chatroom cache invalidated");
        Ok(())
    }
}
