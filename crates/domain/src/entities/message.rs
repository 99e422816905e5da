//! 消息实体定义
//!
//! `gemini_response` 只发生一次 NULL → 终值（成功文本或错误标记）的转换，
//! 且只由 completion worker 写入。

use crate::business_rules::MAX_MESSAGE_CONTENT_LENGTH;
use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 写入 `gemini_response` 的失败标记前缀，清理服务按此匹配
pub const GEMINI_ERROR_MARKER: &str = "[Gemini API Error]";

/// 消息实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// 消息唯一ID
    pub id: Uuid,
    /// 所属聊天室ID
    pub chatroom_id: Uuid,
    /// 发送者用户ID
    pub user_id: Uuid,
    /// 用户原始文本
    pub content: String,
    /// AI 回复文本；worker 写入前为 None，失败时为错误标记文本
    pub gemini_response: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// 创建新消息，回复字段保持为空
    pub fn new(
        chatroom_id: Uuid,
        user_id: Uuid,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let content = content.into();
        Self::validate_content(&content)?;

        Ok(Self {
            id: Uuid::new_v4(),
            chatroom_id,
            user_id,
            content,
            gemini_response: None,
            created_at: now,
        })
    }

    fn validate_content(content: &str) -> DomainResult<()> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("content", "cannot be empty"));
        }
        if content.chars().count() > MAX_MESSAGE_CONTENT_LENGTH {
            return Err(DomainError::validation("content", "too long"));
        }
        Ok(())
    }

    /// 回复是否仍在等待 worker 写入
    pub fn is_pending(&self) -> bool {
        self.gemini_response.is_none()
    }

    /// 回复是否为失败标记文本（大小写不敏感）
    pub fn is_failed(&self) -> bool {
        match &self.gemini_response {
            Some(response) => response
                .to_lowercase()
                .contains(&GEMINI_ERROR_MARKER.to_lowercase()),
            None => false,
        }
    }

    /// 是否可被清理服务删除：未完成或已失败
    pub fn is_cleanup_candidate(&self) -> bool {
        self.is_pending() || self.is_failed()
    }

    /// 构造失败标记文本
    pub fn error_marker(details: impl std::fmt::Display) -> String {
        format!("{} {}", GEMINI_ERROR_MARKER, details)
    }
}
