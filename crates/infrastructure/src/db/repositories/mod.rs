//! 仓储实现模块

pub mod chatroom_repository_impl;
pub mod message_repository_impl;
pub mod user_repository_impl;

pub use chatroom_repository_impl::PgChatroomRepository;
pub use message_repository_impl::PgMessageRepository;
pub use user_repository_impl::PgUserRepository;
