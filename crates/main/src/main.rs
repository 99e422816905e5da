//! 主应用程序入口
//!
//! 启动 Axum Web API 服务，回复生成由独立的 worker 进程消费。

use application::{
    AuthService, ChatroomService, CleanupService, MessageService, RandomOtpGenerator,
    SubscriptionService, SystemClock,
};
use config::AppConfig;
use infrastructure::db::repositories::{
    PgChatroomRepository, PgMessageRepository, PgUserRepository,
};
use infrastructure::{BcryptPasswordHasher, Db, KafkaCompletionQueue, RedisChatroomCache};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').last().unwrap_or("unknown")
    );

    let pool = Arc::new(
        Db::create_pool(&config.database.url, config.database.max_connections).await?,
    );
    sqlx::migrate!("../../migrations").run(&*pool).await?;

    // 基础设施适配器
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let chatroom_repository = Arc::new(PgChatroomRepository::new(pool.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(pool));
    let cache = Arc::new(RedisChatroomCache::new(&config.redis.url).await?);
    let queue = Arc::new(KafkaCompletionQueue::new(&config.kafka)?);
    let password_hasher = Arc::new(BcryptPasswordHasher::new(config.server.bcrypt_cost));
    let otp_generator = Arc::new(RandomOtpGenerator);
    let clock = Arc::new(SystemClock);

    // 应用层服务
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        password_hasher,
        otp_generator,
        clock.clone(),
    ));
    let chatroom_service = Arc::new(ChatroomService::new(
        chatroom_repository.clone(),
        cache.clone(),
        clock.clone(),
    ));
    let message_service = Arc::new(MessageService::new(
        user_repository.clone(),
        chatroom_repository,
        message_repository.clone(),
        cache,
        queue,
        clock.clone(),
    ));
    let subscription_service = Arc::new(SubscriptionService::new(user_repository, clock));
    let cleanup_service = Arc::new(CleanupService::new(message_repository));

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    let state = AppState::new(
        auth_service,
        chatroom_service,
        message_service,
        subscription_service,
        cleanup_service,
        jwt_service,
    );

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("API 服务器启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
