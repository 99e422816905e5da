//! 基础设施层：Postgres 存储、Redis 缓存、Kafka 队列、Gemini 客户端。
//!
//! 实现应用层定义的端口 trait，不包含业务规则。

pub mod db;
pub mod gemini;
pub mod kafka;
pub mod password;
pub mod redis_cache;

pub use db::{Db, DbPool};
pub use gemini::GeminiClient;
pub use kafka::{
    KafkaCompletionQueue, KafkaError, KafkaResult, KafkaTaskConsumer, TaskHandler,
};
pub use password::BcryptPasswordHasher;
pub use redis_cache::RedisChatroomCache;
