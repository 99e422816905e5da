use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Chatroom, Message, RepositoryError, User};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, RepositoryError>;
    async fn update(&self, user: User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn find_by_mobile_number(
        &self,
        mobile_number: &str,
    ) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait ChatroomRepository: Send + Sync {
    async fn create(&self, chatroom: Chatroom) -> Result<Chatroom, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chatroom>, RepositoryError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Chatroom>, RepositoryError>;
    async fn touch(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, RepositoryError>;

    async fn list_by_chatroom(&self, chatroom_id: Uuid) -> Result<Vec<Message>, RepositoryError>;

    // 限流检查：统计某用户在半开区间 [start, end) 内发送的消息数
    async fn count_authored_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, RepositoryError>;

    // worker 回写回复文本；消息已被删除时返回 false（不视为错误）
    async fn set_gemini_response(
        &self,
        id: Uuid,
        response: &str,
    ) -> Result<bool, RepositoryError>;

    // 清理：删除某用户回复为空或含失败标记的消息，返回删除数量
    async fn delete_failed_by_author(&self, user_id: Uuid) -> Result<u64, RepositoryError>;
}
