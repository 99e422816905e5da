//! 消息清理服务
//!
//! 按用户删除回复为空或带失败标记的消息。幂等，只作用于调用者自己的消息。

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApplicationResult;
use crate::repository::MessageRepository;

pub struct CleanupService {
    message_repository: Arc<dyn MessageRepository>,
}

impl CleanupService {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    /// 删除该用户全部失败/未完成的消息，返回删除数量
    pub async fn cleanup(&self, user_id: Uuid) -> ApplicationResult<u64> {
        let deleted = self
            .message_repository
            .delete_failed_by_author(user_id)
            .await?;
        info!(%user_id, deleted, "failed messages purged");
        Ok(deleted)
    }
}
