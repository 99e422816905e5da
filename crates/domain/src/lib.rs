//! 聊天后端核心领域模型
//!
//! 包含用户、聊天室、消息三个核心实体，以及配额、OTP 等业务规则。

pub mod business_rules;
pub mod entities;
pub mod errors;

// 重新导出常用类型
pub use business_rules::*;
pub use entities::*;
pub use errors::*;
