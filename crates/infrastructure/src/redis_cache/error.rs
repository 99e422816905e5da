//! Redis 错误类型定义

use application::CacheError;
use thiserror::Error;

/// Redis 操作错误
#[derive(Error, Debug)]
pub enum RedisCacheError {
    /// 连接错误
    #[error("Redis 连接错误: {message}")]
    ConnectionError { message: String },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    SerializationError { message: String },

    /// 配置错误
    #[error("配置错误: {message}")]
    ConfigError { message: String },
}

impl From<redis::RedisError> for RedisCacheError {
    fn from(err: redis::RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::InvalidClientConfig => RedisCacheError::ConfigError {
                message: err.to_string(),
            },
            _ => RedisCacheError::ConnectionError {
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for RedisCacheError {
    fn from(err: serde_json::Error) -> Self {
        RedisCacheError::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<RedisCacheError> for CacheError {
    fn from(err: RedisCacheError) -> Self {
        match err {
            RedisCacheError::SerializationError { message } => CacheError::Serialization(message),
            other => CacheError::Connection(other.to_string()),
        }
    }
}
