//! 核心实体定义

pub mod chatroom;
pub mod message;
pub mod user;

pub use chatroom::Chatroom;
pub use message::{Message, GEMINI_ERROR_MARKER};
pub use user::{User, UserTier};
