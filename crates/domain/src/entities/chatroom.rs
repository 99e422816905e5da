//! 聊天室实体定义
//!
//! 每个聊天室归属于唯一的用户，只对所有者可见。

use crate::business_rules::MAX_CHATROOM_NAME_LENGTH;
use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 聊天室实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chatroom {
    /// 聊天室唯一ID
    pub id: Uuid,
    /// 所有者用户ID
    pub user_id: Uuid,
    /// 聊天室名称
    pub name: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl Chatroom {
    /// 创建新聊天室
    pub fn new(user_id: Uuid, name: impl Into<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.into();
        Self::validate_name(&name)?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            created_at: now,
            updated_at: now,
        })
    }

    fn validate_name(name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        if name.chars().count() > MAX_CHATROOM_NAME_LENGTH {
            return Err(DomainError::validation("name", "too long"));
        }
        Ok(())
    }

    /// 是否归属于指定用户
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// 写入新消息时刷新更新时间
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
