use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    ChangePasswordPayload, ChatroomResponse, CheckoutWebhookPayload, CleanupResponse,
    CreateChatroomPayload, MessageResponse, MobileNumberPayload, OtpResponse, SendMessagePayload,
    SignupPayload, SubscriptionStatusResponse, TokenResponse, UserResponse, VerifyOtpPayload,
};
use crate::{error::ApiError, state::AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(signup))
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/change-password", post(change_password))
        .route("/user/me", get(current_user))
        .route("/chatroom", post(create_chatroom).get(list_chatrooms))
        .route("/chatroom/{chatroom_id}", get(get_chatroom))
        .route("/chatroom/{chatroom_id}/message", post(send_message))
        .route("/chatroom/{chatroom_id}/messages", get(list_messages))
        .route("/message/{message_id}", get(get_message))
        .route("/subscription/status", get(subscription_status))
        .route("/webhook/checkout", post(checkout_webhook))
        .route("/messages/cleanup", delete(cleanup_messages))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn validate(payload: &impl Validate) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::bad_request(err.to_string()))
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate(&payload)?;
    let user = state
        .auth_service
        .signup(payload.mobile_number, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<MobileNumberPayload>,
) -> Result<Json<OtpResponse>, ApiError> {
    validate(&payload)?;
    let issued = state.auth_service.send_otp(&payload.mobile_number).await?;

    Ok(Json(OtpResponse {
        otp: issued.code,
        expires_at: issued.expires_at,
    }))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate(&payload)?;
    let user = state
        .auth_service
        .verify_otp(&payload.mobile_number, &payload.otp)
        .await?;

    let token = state.jwt_service.generate_token(user.id, user.is_pro)?;
    Ok(Json(TokenResponse {
        token,
        user: user.into(),
    }))
}

async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<MobileNumberPayload>,
) -> Result<Json<OtpResponse>, ApiError> {
    validate(&payload)?;
    let issued = state
        .auth_service
        .forgot_password(&payload.mobile_number)
        .await?;

    Ok(Json(OtpResponse {
        otp: issued.code,
        expires_at: issued.expires_at,
    }))
}

async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<StatusCode, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    validate(&payload)?;
    state
        .auth_service
        .change_password(user_id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    let user = state.auth_service.get_user(user_id).await?;
    Ok(Json(user.into()))
}

async fn create_chatroom(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateChatroomPayload>,
) -> Result<(StatusCode, Json<ChatroomResponse>), ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    validate(&payload)?;
    let chatroom = state.chatroom_service.create(user_id, payload.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ChatroomResponse::summary(chatroom)),
    ))
}

async fn list_chatrooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatroomResponse>>, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    let chatrooms = state.chatroom_service.list(user_id).await?;

    Ok(Json(
        chatrooms
            .into_iter()
            .map(ChatroomResponse::summary)
            .collect(),
    ))
}

async fn get_chatroom(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chatroom_id): Path<Uuid>,
) -> Result<Json<ChatroomResponse>, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    let chatroom = state.chatroom_service.get(chatroom_id, user_id).await?;
    let messages = state
        .message_service
        .list_messages(chatroom_id, user_id)
        .await?;

    Ok(Json(ChatroomResponse::detail(chatroom, messages)))
}

async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chatroom_id): Path<Uuid>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    validate(&payload)?;
    let message = state
        .message_service
        .submit(chatroom_id, user_id, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chatroom_id): Path<Uuid>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    let messages = state
        .message_service
        .list_messages(chatroom_id, user_id)
        .await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

async fn get_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(message_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    let message = state.message_service.get_message(message_id, user_id).await?;
    Ok(Json(message.into()))
}

async fn subscription_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SubscriptionStatusResponse>, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    let tier = state.subscription_service.status(user_id).await?;
    Ok(Json(tier.into()))
}

/// 支付服务商回调，不走 JWT 认证
async fn checkout_webhook(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutWebhookPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .subscription_service
        .checkout_completed(payload.user_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn cleanup_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CleanupResponse>, ApiError> {
    let user_id = state.jwt_service.extract_user_from_headers(&headers)?;
    let deleted = state.cleanup_service.cleanup(user_id).await?;
    Ok(Json(CleanupResponse { deleted }))
}
