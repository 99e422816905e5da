//! 用户实体定义
//!
//! 包含手机号标识、可选密码凭据、OTP 挑战状态和订阅层级。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 订阅层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    /// 受每日配额限制
    Basic,
    /// 不受限制
    Pro,
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserTier::Basic => write!(f, "basic"),
            UserTier::Pro => write!(f, "pro"),
        }
    }
}

/// 用户实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一ID
    pub id: Uuid,
    /// 手机号（唯一）
    pub mobile_number: String,
    /// 密码哈希（敏感信息，不在序列化中包含）
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// OTP 验证码，与 otp_expiry 同设同清
    #[serde(skip_serializing)]
    pub otp_secret: Option<String>,
    /// OTP 过期时间
    #[serde(skip_serializing)]
    pub otp_expiry: Option<DateTime<Utc>>,
    /// 是否为 Pro 订阅用户
    pub is_pro: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 注册新用户
    pub fn new(
        mobile_number: impl Into<String>,
        password_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mobile_number = mobile_number.into();
        Self::validate_mobile_number(&mobile_number)?;

        Ok(Self {
            id: Uuid::new_v4(),
            mobile_number,
            password_hash,
            otp_secret: None,
            otp_expiry: None,
            is_pro: false,
            created_at: now,
            updated_at: now,
        })
    }

    fn validate_mobile_number(mobile_number: &str) -> DomainResult<()> {
        let digits = mobile_number.strip_prefix('+').unwrap_or(mobile_number);
        if digits.len() < 10 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(
                "mobile_number",
                "must be 10-15 digits, optionally prefixed with +",
            ));
        }
        Ok(())
    }

    /// 用户当前层级
    pub fn tier(&self) -> UserTier {
        if self.is_pro {
            UserTier::Pro
        } else {
            UserTier::Basic
        }
    }

    /// 签发 OTP 挑战，覆盖之前未使用的验证码
    pub fn issue_otp(&mut self, code: String, expiry: DateTime<Utc>, now: DateTime<Utc>) {
        self.otp_secret = Some(code);
        self.otp_expiry = Some(expiry);
        self.updated_at = now;
    }

    /// 校验 OTP 并在成功后清除挑战状态
    pub fn verify_otp(&mut self, code: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let (secret, expiry) = match (&self.otp_secret, &self.otp_expiry) {
            (Some(secret), Some(expiry)) => (secret.clone(), *expiry),
            _ => return Err(DomainError::OtpNotRequested),
        };

        if secret != code {
            return Err(DomainError::OtpInvalid);
        }
        if expiry < now {
            return Err(DomainError::OtpExpired);
        }

        self.otp_secret = None;
        self.otp_expiry = None;
        self.updated_at = now;
        Ok(())
    }

    /// 订阅结账完成后升级为 Pro，重复投递时幂等
    pub fn upgrade_to_pro(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_pro {
            return false;
        }
        self.is_pro = true;
        self.updated_at = now;
        true
    }

    /// 修改密码哈希
    pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = Some(password_hash);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_user() -> User {
        User::new("+8613800138000", None, Utc::now()).unwrap()
    }

    #[test]
    fn test_new_user_defaults_to_basic() {
        let user = test_user();
        assert!(!user.is_pro);
        assert_eq!(user.tier(), UserTier::Basic);
        assert!(user.otp_secret.is_none());
        assert!(user.otp_expiry.is_none());
    }

    #[test]
    fn test_invalid_mobile_number_rejected() {
        assert!(User::new("abc", None, Utc::now()).is_err());
        assert!(User::new("123", None, Utc::now()).is_err());
        assert!(User::new("1234567890123456", None, Utc::now()).is_err());
    }

    #[test]
    fn test_otp_verify_clears_state() {
        let mut user = test_user();
        let now = Utc::now();
        user.issue_otp("123456".to_string(), now + Duration::minutes(5), now);

        assert!(user.verify_otp("123456", now).is_ok());
        assert!(user.otp_secret.is_none());
        assert!(user.otp_expiry.is_none());
    }

    #[test]
    fn test_otp_wrong_code_rejected() {
        let mut user = test_user();
        let now = Utc::now();
        user.issue_otp("123456".to_string(), now + Duration::minutes(5), now);

        assert_eq!(user.verify_otp("654321", now), Err(DomainError::OtpInvalid));
        // 失败不清除挑战状态
        assert!(user.otp_secret.is_some());
    }

    #[test]
    fn test_otp_expired_rejected() {
        let mut user = test_user();
        let now = Utc::now();
        user.issue_otp("123456".to_string(), now - Duration::minutes(1), now);

        assert_eq!(user.verify_otp("123456", now), Err(DomainError::OtpExpired));
    }

    #[test]
    fn test_otp_not_requested() {
        let mut user = test_user();
        assert_eq!(
            user.verify_otp("123456", Utc::now()),
            Err(DomainError::OtpNotRequested)
        );
    }

    #[test]
    fn test_upgrade_to_pro_is_idempotent() {
        let mut user = test_user();
        assert!(user.upgrade_to_pro(Utc::now()));
        assert!(user.is_pro);
        // 重复投递不改变状态
        assert!(!user.upgrade_to_pro(Utc::now()));
        assert!(user.is_pro);
        assert_eq!(user.tier(), UserTier::Pro);
    }
}
