//! 订阅服务
//!
//! 支付服务商按 at-least-once 投递 checkout 完成事件，升级操作必须幂等。

use domain::{DomainError, UserTier};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ApplicationResult;
use crate::repository::UserRepository;

pub struct SubscriptionService {
    user_repository: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionService {
    pub fn new(user_repository: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repository,
            clock,
        }
    }

    /// checkout 完成事件：把用户升级为 Pro，重复投递时为 no-op
    pub async fn checkout_completed(&self, user_id: Uuid) -> ApplicationResult<()> {
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if user.upgrade_to_pro(self.clock.now()) {
            self.user_repository.update(user).await?;
            info!(%user_id, "user upgraded to pro");
        }
        Ok(())
    }

    /// 查询用户当前层级
    pub async fn status(&self, user_id: Uuid) -> ApplicationResult<UserTier> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        Ok(user.tier())
    }
}
