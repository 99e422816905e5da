use std::sync::Arc;

use application::{
    AuthService, ChatroomService, CleanupService, MessageService, SubscriptionService,
};

use crate::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub chatroom_service: Arc<ChatroomService>,
    pub message_service: Arc<MessageService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub cleanup_service: Arc<CleanupService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        chatroom_service: Arc<ChatroomService>,
        message_service: Arc<MessageService>,
        subscription_service: Arc<SubscriptionService>,
        cleanup_service: Arc<CleanupService>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            auth_service,
            chatroom_service,
            message_service,
            subscription_service,
            cleanup_service,
            jwt_service,
        }
    }
}
