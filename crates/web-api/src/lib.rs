//! Web API 层。
//!
//! 提供 Axum 路由，将 HTTP 请求委托给应用层的用例服务。

mod auth;
mod dto;
mod error;
mod routes;
mod state;

pub use auth::{Claims, JwtService};
pub use config::JwtConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
