//! 认证服务
//!
//! 注册、OTP 挑战签发与校验、密码修改。JWT 的签发在 web 层完成，
//! 这里只返回校验通过的用户。

use chrono::{DateTime, Duration, Utc};
use domain::{DomainError, User, OTP_TTL_MINUTES};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ApplicationResult;
use crate::otp::OtpGenerator;
use crate::password::PasswordHasher;
use crate::repository::UserRepository;

/// 已签发的 OTP 挑战（模拟下发：验证码随响应返回）
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    otp_generator: Arc<dyn OtpGenerator>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        otp_generator: Arc<dyn OtpGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            otp_generator,
            clock,
        }
    }

    /// 注册新用户，手机号唯一
    pub async fn signup(
        &self,
        mobile_number: String,
        password: Option<String>,
    ) -> ApplicationResult<User> {
        if self
            .user_repository
            .find_by_mobile_number(&mobile_number)
            .await?
            .is_some()
        {
            return Err(DomainError::UserAlreadyExists { mobile_number }.into());
        }

        let password_hash = match password {
            Some(plain) => Some(self.password_hasher.hash(&plain)?),
            None => None,
        };

        let user = User::new(mobile_number, password_hash, self.clock.now())?;
        let user = self.user_repository.create(user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// 为已注册用户签发 OTP 挑战
    pub async fn send_otp(&self, mobile_number: &str) -> ApplicationResult<IssuedOtp> {
        let mut user = self
            .user_repository
            .find_by_mobile_number(mobile_number)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let now = self.clock.now();
        let code = self.otp_generator.generate();
        let expires_at = now + Duration::minutes(OTP_TTL_MINUTES);
        user.issue_otp(code.clone(), expires_at, now);
        self.user_repository.update(user).await?;

        Ok(IssuedOtp { code, expires_at })
    }

    /// 校验 OTP，成功后清除挑战状态并返回用户
    pub async fn verify_otp(&self, mobile_number: &str, code: &str) -> ApplicationResult<User> {
        let mut user = self
            .user_repository
            .find_by_mobile_number(mobile_number)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        user.verify_otp(code, self.clock.now())?;
        let user = self.user_repository.update(user).await?;
        Ok(user)
    }

    /// 忘记密码走同一条 OTP 挑战路径
    pub async fn forgot_password(&self, mobile_number: &str) -> ApplicationResult<IssuedOtp> {
        self.send_otp(mobile_number).await
    }

    /// 修改密码，需要验证旧密码
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> ApplicationResult<()> {
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let current_hash = user
            .password_hash
            .clone()
            .ok_or(DomainError::InvalidCredentials)?;
        if !self.password_hasher.verify(old_password, &current_hash)? {
            return Err(DomainError::InvalidCredentials.into());
        }

        let new_hash = self.password_hasher.hash(new_password)?;
        user.set_password_hash(new_hash, self.clock.now());
        self.user_repository.update(user).await?;
        Ok(())
    }

    /// 读取当前用户
    pub async fn get_user(&self, user_id: Uuid) -> ApplicationResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::ApplicationError;

    fn service(env: &TestEnv) -> AuthService {
        AuthService::new(
            env.users.clone(),
            Arc::new(PlainPasswordHasher),
            Arc::new(FixedOtpGenerator::new("123456")),
            env.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_signup_then_duplicate_rejected() {
        let env = TestEnv::new();
        let service = service(&env);

        let user = service
            .signup("+8613800138000".to_string(), Some("secret".to_string()))
            .await
            .unwrap();
        assert!(!user.is_pro);
        assert!(user.password_hash.is_some());

        let err = service
            .signup("+8613800138000".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::UserAlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_otp_flow() {
        let env = TestEnv::new();
        let service = service(&env);
        service
            .signup("+8613800138000".to_string(), None)
            .await
            .unwrap();

        let issued = service.send_otp("+8613800138000").await.unwrap();
        assert_eq!(issued.code, "123456");

        let user = service.verify_otp("+8613800138000", "123456").await.unwrap();
        // 验证成功后挑战状态被清除
        assert!(user.otp_secret.is_none());
        assert!(user.otp_expiry.is_none());
    }

    #[tokio::test]
    async fn test_otp_wrong_code() {
        let env = TestEnv::new();
        let service = service(&env);
        service
            .signup("+8613800138000".to_string(), None)
            .await
            .unwrap();
        service.send_otp("+8613800138000").await.unwrap();

        let err = service
            .verify_otp("+8613800138000", "000000")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::OtpInvalid)
        ));
    }

    #[tokio::test]
    async fn test_otp_expired() {
        let env = TestEnv::new();
        let service = service(&env);
        service
            .signup("+8613800138000".to_string(), None)
            .await
            .unwrap();
        service.send_otp("+8613800138000").await.unwrap();

        // 拨快时钟超过有效期
        env.clock.advance(chrono::Duration::minutes(OTP_TTL_MINUTES + 1));

        let err = service
            .verify_otp("+8613800138000", "123456")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::OtpExpired)
        ));
    }

    #[tokio::test]
    async fn test_change_password_requires_old() {
        let env = TestEnv::new();
        let service = service(&env);
        let user = service
            .signup("+8613800138000".to_string(), Some("old-pass".to_string()))
            .await
            .unwrap();

        let err = service
            .change_password(user.id, "wrong", "new-pass")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidCredentials)
        ));

        service
            .change_password(user.id, "old-pass", "new-pass")
            .await
            .unwrap();

        let updated = service.get_user(user.id).await.unwrap();
        assert_eq!(updated.password_hash.as_deref(), Some("hashed:new-pass"));
    }
}
