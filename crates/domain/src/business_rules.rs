//! 业务规则常量
//!
//! 集中定义配额、有效期等可审计的业务参数。

use std::time::Duration;

/// Basic 用户每个 UTC 自然日的消息配额，Pro 用户不受限
pub const FREE_DAILY_MESSAGE_LIMIT: i64 = 10;

/// OTP 验证码有效期（分钟）
pub const OTP_TTL_MINUTES: i64 = 5;

/// OTP 验证码位数
pub const OTP_CODE_LENGTH: usize = 6;

/// 聊天室列表缓存有效期
pub const CHATROOM_CACHE_TTL: Duration = Duration::from_secs(30);

/// 消息内容最大长度（字符数）
pub const MAX_MESSAGE_CONTENT_LENGTH: usize = 4000;

/// 聊天室名称最大长度
pub const MAX_CHATROOM_NAME_LENGTH: usize = 100;
