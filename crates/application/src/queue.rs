//! 回复生成任务队列端口
//!
//! at-least-once 投递：同一任务可能被重复消费，`gemini_response` 的写入
//! 是单调的 NULL → 终值转换，重复写入同一终值是安全的。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 队列上的任务载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionTask {
    /// 待补全的消息ID
    pub message_id: Uuid,
    /// 用户原始文本
    pub content: String,
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue connection error: {0}")]
    Connection(String),
    #[error("enqueue failed: {0}")]
    Enqueue(String),
    #[error("task serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait CompletionQueue: Send + Sync {
    async fn enqueue(&self, task: CompletionTask) -> Result<(), QueueError>;
}
