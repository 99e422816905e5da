//! 请求/响应 DTO
//!
//! 请求体用 validator 做边界校验，领域层仍会做最终校验。
//! 响应体不暴露密码哈希和 OTP 状态。

use chrono::{DateTime, Utc};
use domain::{Chatroom, Message, User, UserTier};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupPayload {
    #[validate(length(min = 10, max = 16))]
    pub mobile_number: String,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MobileNumberPayload {
    #[validate(length(min = 10, max = 16))]
    pub mobile_number: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpPayload {
    #[validate(length(min = 10, max = 16))]
    pub mobile_number: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, max = 128))]
    pub old_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatroomPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessagePayload {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutWebhookPayload {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub mobile_number: String,
    pub is_pro: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            mobile_number: user.mobile_number,
            is_pro: user.is_pro,
            created_at: user.created_at,
        }
    }
}

/// 模拟下发：验证码直接随响应返回
#[derive(Debug, Serialize)]
pub struct OtpResponse {
    pub otp: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub chatroom_id: Uuid,
    pub content: String,
    pub gemini_response: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            chatroom_id: message.chatroom_id,
            content: message.content,
            gemini_response: message.gemini_response,
            created_at: message.created_at,
        }
    }
}

/// 列表响应里 `messages` 恒为空数组，详情接口才联表取消息
#[derive(Debug, Serialize)]
pub struct ChatroomResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageResponse>,
}

impl ChatroomResponse {
    pub fn summary(chatroom: Chatroom) -> Self {
        Self {
            id: chatroom.id,
            name: chatroom.name,
            created_at: chatroom.created_at,
            messages: Vec::new(),
        }
    }

    pub fn detail(chatroom: Chatroom, messages: Vec<Message>) -> Self {
        Self {
            id: chatroom.id,
            name: chatroom.name,
            created_at: chatroom.created_at,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionStatusResponse {
    pub tier: String,
}

impl From<UserTier> for SubscriptionStatusResponse {
    fn from(tier: UserTier) -> Self {
        Self {
            tier: tier.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub deleted: u64,
}
