//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理输入校验、配额检查、
//! 以及对外部适配器（存储、缓存、任务队列、补全 API）的抽象。

pub mod cache;
pub mod clock;
pub mod completion;
pub mod error;
pub mod otp;
pub mod password;
pub mod queue;
pub mod repository;
pub mod services;

#[cfg(test)]
pub mod test_support;

pub use cache::{CacheError, ChatroomCache};
pub use clock::{Clock, SystemClock};
pub use completion::{CompletionApi, CompletionApiError};
pub use error::{ApplicationError, ApplicationResult};
pub use otp::{OtpGenerator, RandomOtpGenerator};
pub use password::{PasswordHasher, PasswordHasherError};
pub use queue::{CompletionQueue, CompletionTask, QueueError};
pub use repository::{ChatroomRepository, MessageRepository, UserRepository};
pub use services::{
    AuthService, ChatroomService, CleanupService, CompletionOutcome, CompletionWorker,
    MessageService, SubscriptionService,
};
