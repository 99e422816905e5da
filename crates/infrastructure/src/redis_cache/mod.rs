//! Redis 缓存模块
//!
//! 聊天室列表的读缓存，键为 `chatrooms:{user_id}`，带 TTL。

pub mod cache;
pub mod error;

pub use cache::*;
pub use error::*;
