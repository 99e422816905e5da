//! 领域模型错误定义
//!
//! 定义了系统中所有可能的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 用户不存在
    #[error("user not found")]
    UserNotFound,

    /// 用户已存在
    #[error("user already exists: {mobile_number}")]
    UserAlreadyExists { mobile_number: String },

    /// 聊天室不存在或不属于当前用户
    #[error("chatroom not found")]
    ChatroomNotFound,

    /// 消息不存在或不属于当前用户
    #[error("message not found")]
    MessageNotFound,

    /// 当日消息配额已用完
    #[error("daily message limit reached: {sent_today}/{limit}")]
    RateLimitExceeded { sent_today: i64, limit: i64 },

    /// 未申请过 OTP 或已被清除
    #[error("otp not requested")]
    OtpNotRequested,

    /// OTP 验证码错误
    #[error("invalid otp")]
    OtpInvalid,

    /// OTP 验证码已过期
    #[error("otp expired")]
    OtpExpired,

    /// 凭据错误（旧密码不匹配等）
    #[error("invalid credentials")]
    InvalidCredentials,

    /// 验证错误
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 记录不存在
    #[error("record not found")]
    NotFound,

    /// 唯一约束冲突
    #[error("record already exists")]
    Conflict,

    /// 存储访问失败
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
