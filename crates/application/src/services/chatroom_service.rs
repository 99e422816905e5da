//! 聊天室服务
//!
//! 列表读取路径是唯一填充缓存的地方；创建聊天室只删除缓存项。

use domain::{Chatroom, DomainError, CHATROOM_CACHE_TTL};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::ChatroomCache;
use crate::clock::Clock;
use crate::error::ApplicationResult;
use crate::repository::ChatroomRepository;

pub struct ChatroomService {
    chatroom_repository: Arc<dyn ChatroomRepository>,
    cache: Arc<dyn ChatroomCache>,
    clock: Arc<dyn Clock>,
}

impl ChatroomService {
    pub fn new(
        chatroom_repository: Arc<dyn ChatroomRepository>,
        cache: Arc<dyn ChatroomCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chatroom_repository,
            cache,
            clock,
        }
    }

    /// 创建聊天室并使所有者的列表缓存失效
    pub async fn create(&self, user_id: Uuid, name: String) -> ApplicationResult<Chatroom> {
        let chatroom = Chatroom::new(user_id, name, self.clock.now())?;
        let chatroom = self.chatroom_repository.create(chatroom).await?;

        self.cache.invalidate(user_id).await?;

        Ok(chatroom)
    }

    /// 列出用户的全部聊天室，短 TTL 缓存
    pub async fn list(&self, user_id: Uuid) -> ApplicationResult<Vec<Chatroom>> {
        // 缓存读取失败降级为未命中：列表总能从存储重建
        match self.cache.get(user_id).await {
            Ok(Some(cached)) => {
                debug!(%user_id, "chatroom listing served from cache");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(err) => warn!(%user_id, error = %err, "chatroom cache read failed, falling back to store"),
        }

        let chatrooms = self.chatroom_repository.list_by_owner(user_id).await?;

        if let Err(err) = self
            .cache
            .put(user_id, &chatrooms, CHATROOM_CACHE_TTL)
            .await
        {
            warn!(%user_id, error = %err, "chatroom cache write failed");
        }

        Ok(chatrooms)
    }

    /// 读取单个聊天室，需要所有权
    pub async fn get(&self, chatroom_id: Uuid, user_id: Uuid) -> ApplicationResult<Chatroom> {
        self.chatroom_repository
            .find_by_id(chatroom_id)
            .await?
            .filter(|room| room.is_owned_by(user_id))
            .ok_or(DomainError::ChatroomNotFound.into())
    }
}
