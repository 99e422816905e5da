//! 应用层用例服务

pub mod auth_service;
pub mod chatroom_service;
pub mod cleanup_service;
pub mod completion_worker;
pub mod message_service;
pub mod subscription_service;


pub use auth_service::{AuthService, IssuedOtp};
pub use chatroom_service::ChatroomService;
pub use cleanup_service::CleanupService;
pub use completion_worker::{CompletionOutcome, CompletionWorker};
pub use message_service::MessageService;
pub use subscription_service::SubscriptionService;
