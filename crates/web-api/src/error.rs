use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;
        use domain::DomainError;

        match error {
            AppErr::Domain(DomainError::Validation { field, message }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                format!("{}: {}", field, message),
            ),
            AppErr::Domain(DomainError::UserAlreadyExists { mobile_number }) => ApiError::new(
                StatusCode::CONFLICT,
                "USER_EXISTS",
                format!("user already exists: {}", mobile_number),
            ),
            AppErr::Domain(DomainError::UserNotFound) => {
                ApiError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "user not found")
            }
            AppErr::Domain(DomainError::ChatroomNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "CHATROOM_NOT_FOUND",
                "chatroom not found",
            ),
            AppErr::Domain(DomainError::MessageNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "MESSAGE_NOT_FOUND",
                "message not found",
            ),
            AppErr::Domain(DomainError::RateLimitExceeded { sent_today, limit }) => ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!("daily message limit reached: {}/{}", sent_today, limit),
            ),
            AppErr::Domain(DomainError::OtpNotRequested) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "OTP_NOT_REQUESTED",
                "no otp challenge pending",
            ),
            AppErr::Domain(DomainError::OtpInvalid) => {
                ApiError::new(StatusCode::BAD_REQUEST, "OTP_INVALID", "invalid otp code")
            }
            AppErr::Domain(DomainError::OtpExpired) => {
                ApiError::new(StatusCode::BAD_REQUEST, "OTP_EXPIRED", "otp code expired")
            }
            AppErr::Domain(DomainError::InvalidCredentials) => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "invalid credentials",
            ),
            AppErr::Repository(repo_err) => match repo_err {
                domain::RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                domain::RepositoryError::Conflict => {
                    ApiError::new(StatusCode::CONFLICT, "CONFLICT", "resource already exists")
                }
                domain::RepositoryError::Storage { message } => ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    format!("database error: {}", message),
                ),
            },
            AppErr::Cache(err) => ApiError::internal_server_error(format!("cache error: {}", err)),
            AppErr::Queue(err) => {
                ApiError::internal_server_error(format!("task queue error: {}", err))
            }
            AppErr::CompletionApi(err) => {
                ApiError::internal_server_error(format!("completion api error: {}", err))
            }
            AppErr::Password(err) => {
                ApiError::internal_server_error(format!("password error: {}", err))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
