//! Kafka 任务消费者
//!
//! 支持优雅关闭和错误恢复，单个任务的失败不会中断消费循环。

use crate::kafka::{KafkaError, KafkaResult};
use application::{CompletionOutcome, CompletionTask, CompletionWorker};
use async_trait::async_trait;
use config::KafkaConfig;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Message};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// 任务处理器 trait
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// 处理一个反序列化后的任务
    async fn handle_task(
        &self,
        task: CompletionTask,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// worker 本身吞掉所有失败，处理结果只用于日志
#[async_trait]
impl TaskHandler for CompletionWorker {
    async fn handle_task(
        &self,
        task: CompletionTask,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let message_id = task.message_id;
        match self.handle(task).await {
            CompletionOutcome::Completed => {}
            CompletionOutcome::MessageGone => {
                debug!(%message_id, "task skipped, message already deleted");
            }
            CompletionOutcome::StoreFailed(details) => {
                error!(%message_id, details, "task finished without persisting response");
            }
        }
        Ok(())
    }
}

/// Kafka 任务消费者
///
/// 作为消费者组成员，利用 Kafka 自动分区重平衡机制。
pub struct KafkaTaskConsumer {
    consumer: StreamConsumer,
    topic: String,
    shutdown_signal: Arc<AtomicBool>,
}

impl KafkaTaskConsumer {
    /// 创建新的 Kafka 消费者
    ///
    /// # 参数
    /// - `config`: Kafka 配置
    ///
    /// # 返回
    /// - `Ok(KafkaTaskConsumer)`: 成功创建的消费者
    /// - `Err(KafkaError)`: 创建失败的错误
    pub fn new(config: &KafkaConfig) -> KafkaResult<Self> {
        let mut client_config = ClientConfig::new();

        // 基本配置
        client_config
            .set("group.id", &config.consumer_group_id)
            .set("bootstrap.servers", config.brokers.join(","))
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "10000")
            .set("heartbeat.interval.ms", "3000")
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "1000")
            .set("auto.offset.reset", "earliest"); // 任务不能因重启丢失

        let consumer: StreamConsumer =
            client_config
                .create()
                .map_err(|e| KafkaError::ConfigError {
                    message: format!("创建 Kafka 消费者失败: {}", e),
                })?;

        info!(
            "Kafka 消费者创建成功，消费者组: {}",
            config.consumer_group_id
        );

        Ok(Self {
            consumer,
            topic: config.completion_tasks_topic.clone(),
            shutdown_signal: Arc::new(AtomicBool::new(false)),
        })
    }

    /// 订阅主题并开始消费
    ///
    /// # 参数
    /// - `handler`: 任务处理器
    ///
    /// # 返回
    /// - `Ok(())`: 消费循环正常退出
    /// - `Err(KafkaError)`: 订阅或消费失败
    pub async fn subscribe_and_consume<H>(&self, handler: Arc<H>) -> KafkaResult<()>
    where
        H: TaskHandler + 'static,
    {
        self.consumer
            .subscribe(&[&self.topic])
            .map_err(|e| KafkaError::ConsumerError {
                message: format!("订阅主题失败: {}", e),
            })?;

        info!("已订阅主题: {}", self.topic);

        self.consume_loop(handler).await
    }

    /// 消费循环
    async fn consume_loop<H>(&self, handler: Arc<H>) -> KafkaResult<()>
    where
        H: TaskHandler + 'static,
    {
        let mut retry_count = 0;
        const MAX_RETRIES: u32 = 5;

        while !self.shutdown_signal.load(Ordering::Relaxed) {
            match self.consumer.recv().await {
                Ok(message) => {
                    retry_count = 0; // 重置重试计数

                    if let Err(e) = self.process_message(&message, &handler).await {
                        error!("处理任务失败: {}", e);
                        // 继续处理下一条消息，不中断消费
                    }
                }
                Err(e) => {
                    error!("接收消息失败: {}", e);
                    retry_count += 1;

                    if retry_count >= MAX_RETRIES {
                        error!("达到最大重试次数，停止消费");
                        return Err(KafkaError::ConsumerError {
                            message: format!("消费失败，已重试 {} 次", MAX_RETRIES),
                        });
                    }

                    // 指数退避
                    let delay = Duration::from_millis(1000 * (2_u64.pow(retry_count - 1)));
                    warn!("等待 {:?} 后重试...", delay);
                    sleep(delay).await;
                }
            }
        }

        info!("消费循环已停止");
        Ok(())
    }

    /// 处理单条消息
    async fn process_message<H>(
        &self,
        message: &BorrowedMessage<'_>,
        handler: &Arc<H>,
    ) -> KafkaResult<()>
    where
        H: TaskHandler,
    {
        let payload = message
            .payload()
            .ok_or_else(|| KafkaError::DeserializationError {
                message: "消息负载为空".to_string(),
            })?;

        let task: CompletionTask =
            serde_json::from_slice(payload).map_err(|e| KafkaError::DeserializationError {
                message: format!("反序列化任务失败: {}", e),
            })?;

        debug!(
            message_id = %task.message_id,
            partition = message.partition(),
            offset = message.offset(),
            "received completion task"
        );

        if let Err(e) = handler.handle_task(task).await {
            return Err(KafkaError::ConsumerError {
                message: format!("任务处理失败: {}", e),
            });
        }

        Ok(())
    }

    /// 优雅关闭消费者
    pub async fn shutdown(&self) -> KafkaResult<()> {
        info!("开始关闭 Kafka 消费者");
        self.shutdown_signal.store(true, Ordering::Relaxed);

        // 等待消费循环退出
        sleep(Duration::from_millis(1000)).await;

        info!("Kafka 消费者已关闭");
        Ok(())
    }

    /// 检查消费者是否正在运行
    pub fn is_running(&self) -> bool {
        !self.shutdown_signal.load(Ordering::Relaxed)
    }
}

impl Drop for KafkaTaskConsumer {
    fn drop(&mut self) {
        self.shutdown_signal.store(true, Ordering::Relaxed);
        info!("Kafka 消费者正在释放资源");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingHandler {
        received: Arc<Mutex<Vec<CompletionTask>>>,
    }

    #[async_trait]
    impl TaskHandler for RecordingHandler {
        async fn handle_task(
            &self,
            task: CompletionTask,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.received.lock().unwrap().push(task);
            Ok(())
        }
    }

    fn create_test_config() -> KafkaConfig {
        KafkaConfig {
            brokers: vec!["localhost:9092".to_string()],
            completion_tasks_topic: "test-completion-tasks".to_string(),
            consumer_group_id: "test-consumer-group".to_string(),
            send_timeout_ms: 1000,
            retry_count: 2,
            acks: "1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_consumer_creation() {
        let config = create_test_config();

        if std::env::var("KAFKA_INTEGRATION_TEST").is_ok() {
            let consumer = KafkaTaskConsumer::new(&config);
            assert!(consumer.is_ok());
        }
    }

    #[tokio::test]
    async fn test_handler_receives_deserialized_task() {
        let handler = RecordingHandler::default();
        let task = CompletionTask {
            message_id: Uuid::new_v4(),
            content: "hello".to_string(),
        };

        handler.handle_task(task.clone()).await.unwrap();
        assert_eq!(handler.received.lock().unwrap().as_slice(), &[task]);
    }

    #[tokio::test]
    async fn test_shutdown_signal() {
        let config = create_test_config();

        if std::env::var("KAFKA_INTEGRATION_TEST").is_ok() {
            let consumer = KafkaTaskConsumer::new(&config).unwrap();
            assert!(consumer.is_running());

            consumer.shutdown().await.unwrap();
            assert!(!consumer.is_running());
        }
    }
}
