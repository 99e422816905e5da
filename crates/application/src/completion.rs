//! 外部补全 API 端口

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionApiError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// 用自由文本请求一次补全，返回回复文本
    async fn complete(&self, prompt: &str) -> Result<String, CompletionApiError>;
}
