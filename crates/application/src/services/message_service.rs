//! 消息提交服务
//!
//! 提交路径：所有权校验 → 配额检查 → 持久化 → 缓存失效 → 入队。
//! 配额检查与写入不在同一事务内，边界附近的并发提交存在已知的竞争窗口。

use chrono::{DateTime, Duration, NaiveTime, Utc};
use domain::{DomainError, Message, FREE_DAILY_MESSAGE_LIMIT};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::cache::ChatroomCache;
use crate::clock::Clock;
use crate::error::ApplicationResult;
use crate::queue::{CompletionQueue, CompletionTask};
use crate::repository::{ChatroomRepository, MessageRepository, UserRepository};

pub struct MessageService {
    user_repository: Arc<dyn UserRepository>,
    chatroom_repository: Arc<dyn ChatroomRepository>,
    message_repository: Arc<dyn MessageRepository>,
    cache: Arc<dyn ChatroomCache>,
    queue: Arc<dyn CompletionQueue>,
    clock: Arc<dyn Clock>,
}

impl MessageService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        chatroom_repository: Arc<dyn ChatroomRepository>,
        message_repository: Arc<dyn MessageRepository>,
        cache: Arc<dyn ChatroomCache>,
        queue: Arc<dyn CompletionQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            chatroom_repository,
            message_repository,
            cache,
            queue,
            clock,
        }
    }

    /// 提交消息并调度异步回复生成
    pub async fn submit(
        &self,
        chatroom_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> ApplicationResult<Message> {
        let chatroom = self
            .chatroom_repository
            .find_by_id(chatroom_id)
            .await?
            .filter(|room| room.is_owned_by(user_id))
            .ok_or(DomainError::ChatroomNotFound)?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !user.is_pro {
            let now = self.clock.now();
            let (day_start, day_end) = utc_day_window(now);
            let sent_today = self
                .message_repository
                .count_authored_between(user_id, day_start, day_end)
                .await?;
            if sent_today >= FREE_DAILY_MESSAGE_LIMIT {
                debug!(%user_id, sent_today, "daily message quota exhausted");
                return Err(DomainError::RateLimitExceeded {
                    sent_today,
                    limit: FREE_DAILY_MESSAGE_LIMIT,
                }
                .into());
            }
        }

        let message = Message::new(chatroom.id, user_id, content, self.clock.now())?;
        let message = self.message_repository.create(message).await?;
        self.chatroom_repository
            .touch(chatroom.id, message.created_at)
            .await?;

        // 删除失败必须上抛：吞掉会让下一次列表读取命中过期快照
        self.cache.invalidate(user_id).await?;

        let task = CompletionTask {
            message_id: message.id,
            content: message.content.clone(),
        };
        if let Err(err) = self.queue.enqueue(task).await {
            // 消息已落库但任务未入队，回复会一直停留在 NULL，
            // 用户可通过清理接口删除；这里不掩盖失败
            error!(
                message_id = %message.id,
                error = %err,
                "message persisted but completion task enqueue failed; reply will stay pending"
            );
            return Err(err.into());
        }

        Ok(message)
    }

    /// 读取单条消息，仅限作者本人
    pub async fn get_message(&self, message_id: Uuid, user_id: Uuid) -> ApplicationResult<Message> {
        self.message_repository
            .find_by_id(message_id)
            .await?
            .filter(|message| message.user_id == user_id)
            .ok_or(DomainError::MessageNotFound.into())
    }

    /// 读取聊天室内全部消息，需要所有权
    pub async fn list_messages(
        &self,
        chatroom_id: Uuid,
        user_id: Uuid,
    ) -> ApplicationResult<Vec<Message>> {
        self.chatroom_repository
            .find_by_id(chatroom_id)
            .await?
            .filter(|room| room.is_owned_by(user_id))
            .ok_or(DomainError::ChatroomNotFound)?;

        Ok(self.message_repository.list_by_chatroom(chatroom_id).await?)
    }
}

/// 当前 UTC 自然日的半开区间 [今日零点, 明日零点)
pub(crate) fn utc_day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (day_start, day_start + Duration::days(1))
}
