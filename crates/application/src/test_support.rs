//! 单元测试共用的内存版端口实现
//!
//! 不依赖 Postgres/Redis/Kafka，直接在进程内验证服务语义。

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::{Chatroom, Message, RepositoryError, User, GEMINI_ERROR_MARKER};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;
use uuid::Uuid;

use crate::cache::{CacheError, ChatroomCache};
use crate::clock::Clock;
use crate::completion::{CompletionApi, CompletionApiError};
use crate::otp::OtpGenerator;
use crate::password::{PasswordHasher, PasswordHasherError};
use crate::queue::{CompletionQueue, CompletionTask, QueueError};
use crate::repository::{ChatroomRepository, MessageRepository, UserRepository};

/// 可手动拨动的时钟
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 8, 10, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Clock for MutableClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

fn take_failure(failures: &Mutex<Vec<RepositoryError>>) -> Result<(), RepositoryError> {
    match failures.lock().unwrap().pop() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// 内存用户仓储
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
    failures: Mutex<Vec<RepositoryError>>,
}

impl InMemoryUserRepository {
    pub fn fail_next(&self, err: RepositoryError) {
        self.failures.lock().unwrap().push(err);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        take_failure(&self.failures)?;
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.mobile_number == user.mobile_number)
        {
            return Err(RepositoryError::Conflict);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepositoryError> {
        take_failure(&self.failures)?;
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        take_failure(&self.failures)?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_mobile_number(
        &self,
        mobile_number: &str,
    ) -> Result<Option<User>, RepositoryError> {
        take_failure(&self.failures)?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.mobile_number == mobile_number)
            .cloned())
    }
}

/// 内存聊天室仓储
#[derive(Default)]
pub struct InMemoryChatroomRepository {
    chatrooms: Mutex<HashMap<Uuid, Chatroom>>,
    failures: Mutex<Vec<RepositoryError>>,
}

impl InMemoryChatroomRepository {
    pub fn fail_next(&self, err: RepositoryError) {
        self.failures.lock().unwrap().push(err);
    }
}

#[async_trait]
impl ChatroomRepository for InMemoryChatroomRepository {
    async fn create(&self, chatroom: Chatroom) -> Result<Chatroom, RepositoryError> {
        take_failure(&self.failures)?;
        self.chatrooms
            .lock()
            .unwrap()
            .insert(chatroom.id, chatroom.clone());
        Ok(chatroom)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chatroom>, RepositoryError> {
        take_failure(&self.failures)?;
        Ok(self.chatrooms.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Chatroom>, RepositoryError> {
        take_failure(&self.failures)?;
        let mut rooms: Vec<Chatroom> = self
            .chatrooms
            .lock()
            .unwrap()
            .values()
            .filter(|room| room.user_id == owner_id)
            .cloned()
            .collect();
        rooms.sort_by_key(|room| room.created_at);
        Ok(rooms)
    }

    async fn touch(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        take_failure(&self.failures)?;
        let mut rooms = self.chatrooms.lock().unwrap();
        let room = rooms.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        room.touch(now);
        Ok(())
    }
}

/// 内存消息仓储
#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Mutex<HashMap<Uuid, Message>>,
    failures: Mutex<Vec<RepositoryError>>,
}

impl InMemoryMessageRepository {
    pub fn fail_next(&self, err: RepositoryError) {
        self.failures.lock().unwrap().push(err);
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        take_failure(&self.failures)?;
        self.messages
            .lock()
            .unwrap()
            .insert(message.id, message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, RepositoryError> {
        take_failure(&self.failures)?;
        Ok(self.messages.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_chatroom(&self, chatroom_id: Uuid) -> Result<Vec<Message>, RepositoryError> {
        take_failure(&self.failures)?;
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.chatroom_id == chatroom_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn count_authored_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        take_failure(&self.failures)?;
        Ok(self
            .messages
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.user_id == user_id && m.created_at >= start && m.created_at < end)
            .count() as i64)
    }

    async fn set_gemini_response(
        &self,
        id: Uuid,
        response: &str,
    ) -> Result<bool, RepositoryError> {
        take_failure(&self.failures)?;
        let mut messages = self.messages.lock().unwrap();
        match messages.get_mut(&id) {
            Some(message) => {
                message.gemini_response = Some(response.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_failed_by_author(&self, user_id: Uuid) -> Result<u64, RepositoryError> {
        take_failure(&self.failures)?;
        let mut messages = self.messages.lock().unwrap();
        let marker = GEMINI_ERROR_MARKER.to_lowercase();
        let doomed: Vec<Uuid> = messages
            .values()
            .filter(|m| {
                m.user_id == user_id
                    && match &m.gemini_response {
                        None => true,
                        Some(response) => response.to_lowercase().contains(&marker),
                    }
            })
            .map(|m| m.id)
            .collect();
        for id in &doomed {
            messages.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

/// 内存缓存（忽略 TTL，按需模拟读失败）
#[derive(Default)]
pub struct InMemoryChatroomCache {
    entries: Mutex<HashMap<Uuid, Vec<Chatroom>>>,
    read_failures: Mutex<bool>,
}

impl InMemoryChatroomCache {
    pub fn fail_reads(&self, fail: bool) {
        *self.read_failures.lock().unwrap() = fail;
    }
}

#[async_trait]
impl ChatroomCache for InMemoryChatroomCache {
    async fn get(&self, user_id: Uuid) -> Result<Option<Vec<Chatroom>>, CacheError> {
        if *self.read_failures.lock().unwrap() {
            return Err(CacheError::Connection("read failure injected".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(&user_id).cloned())
    }

    async fn put(
        &self,
        user_id: Uuid,
        chatrooms: &[Chatroom],
        _ttl: StdDuration,
    ) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(user_id, chatrooms.to_vec());
        Ok(())
    }

    async fn invalidate(&self, user_id: Uuid) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

/// 记录入队任务的队列，支持注入失败
#[derive(Default)]
pub struct RecordingQueue {
    tasks: Mutex<Vec<CompletionTask>>,
    fail_enqueue: Mutex<bool>,
}

impl RecordingQueue {
    pub fn fail_enqueue(&self, fail: bool) {
        *self.fail_enqueue.lock().unwrap() = fail;
    }

    pub fn tasks(&self) -> Vec<CompletionTask> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionQueue for RecordingQueue {
    async fn enqueue(&self, task: CompletionTask) -> Result<(), QueueError> {
        if *self.fail_enqueue.lock().unwrap() {
            return Err(QueueError::Enqueue("enqueue failure injected".to_string()));
        }
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }
}

/// 固定行为的补全 API
pub struct StubCompletionApi {
    result: Result<String, String>,
}

impl StubCompletionApi {
    pub fn succeeding(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
        }
    }

    pub fn failing(details: &str) -> Self {
        Self {
            result: Err(details.to_string()),
        }
    }
}

#[async_trait]
impl CompletionApi for StubCompletionApi {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionApiError> {
        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(details) => Err(CompletionApiError::Network(details.clone())),
        }
    }
}

/// 明文“哈希”，只用于测试
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("hashed:{}", plain))
    }

    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        Ok(hashed == format!("hashed:{}", plain))
    }
}

/// 固定验证码生成器
pub struct FixedOtpGenerator {
    code: String,
}

impl FixedOtpGenerator {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
        }
    }
}

impl OtpGenerator for FixedOtpGenerator {
    fn generate(&self) -> String {
        self.code.clone()
    }
}

/// 服务测试共用的环境
pub struct TestEnv {
    pub users: Arc<InMemoryUserRepository>,
    pub chatrooms: Arc<InMemoryChatroomRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub cache: Arc<InMemoryChatroomCache>,
    pub queue: Arc<RecordingQueue>,
    pub clock: Arc<MutableClock>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            chatrooms: Arc::new(InMemoryChatroomRepository::default()),
            messages: Arc::new(InMemoryMessageRepository::default()),
            cache: Arc::new(InMemoryChatroomCache::default()),
            queue: Arc::new(RecordingQueue::default()),
            clock: Arc::new(MutableClock::new()),
        }
    }

    pub async fn add_user(&self, mobile_number: &str, is_pro: bool) -> User {
        let mut user = User::new(mobile_number, None, self.clock.now()).unwrap();
        user.is_pro = is_pro;
        self.users.create(user).await.unwrap()
    }

    pub async fn add_chatroom(&self, owner_id: Uuid, name: &str) -> Chatroom {
        let chatroom = Chatroom::new(owner_id, name, self.clock.now()).unwrap();
        self.chatrooms.create(chatroom).await.unwrap()
    }

    pub async fn add_message(&self, chatroom_id: Uuid, user_id: Uuid, content: &str) -> Message {
        let message = Message::new(chatroom_id, user_id, content, self.clock.now()).unwrap();
        self.messages.create(message).await.unwrap()
    }
}
