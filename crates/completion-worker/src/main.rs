//! 回复生成 worker 进程
//!
//! 从 Kafka 消费任务，调用 Gemini 生成回复并写回数据库。
//! 与 API 进程独立部署，可水平扩展（同一消费者组内自动分区）。

use application::CompletionWorker;
use config::AppConfig;
use infrastructure::db::repositories::PgMessageRepository;
use infrastructure::{Db, GeminiClient, KafkaTaskConsumer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    let pool = Arc::new(
        Db::create_pool(&config.database.url, config.database.max_connections).await?,
    );
    let message_repository = Arc::new(PgMessageRepository::new(pool));

    let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
    let worker = Arc::new(CompletionWorker::new(message_repository, gemini));

    let consumer = Arc::new(KafkaTaskConsumer::new(&config.kafka)?);

    // Ctrl-C 触发优雅关闭
    let shutdown_consumer = consumer.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("收到关闭信号");
            let _ = shutdown_consumer.shutdown().await;
        }
    });

    tracing::info!(
        topic = %config.kafka.completion_tasks_topic,
        group = %config.kafka.consumer_group_id,
        "completion worker 启动"
    );
    consumer.subscribe_and_consume(worker).await?;

    Ok(())
}
