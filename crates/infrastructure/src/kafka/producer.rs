//! Kafka 任务生产者
//!
//! 使用消息ID作为分区键，同一消息的任务落在同一分区。

use crate::kafka::{KafkaError, KafkaResult};
use application::{CompletionQueue, CompletionTask, QueueError};
use async_trait::async_trait;
use config::KafkaConfig;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// 回复生成任务的 Kafka 生产者
pub struct KafkaCompletionQueue {
    producer: FutureProducer,
    topic: String,
    config: KafkaConfig,
}

impl KafkaCompletionQueue {
    /// 创建新的 Kafka 生产者
    ///
    /// # 参数
    /// - `config`: Kafka 配置，主题取自 `completion_tasks_topic`
    ///
    /// # 返回
    /// - `Ok(KafkaCompletionQueue)`: 成功创建的生产者
    /// - `Err(KafkaError)`: 创建失败的错误
    pub fn new(config: &KafkaConfig) -> KafkaResult<Self> {
        let mut client_config = ClientConfig::new();

        // 基本配置
        client_config
            .set("bootstrap.servers", config.brokers.join(","))
            .set("message.timeout.ms", config.send_timeout_ms.to_string())
            .set("acks", &config.acks)
            .set("retries", config.retry_count.to_string())
            .set("enable.idempotence", "true") // 启用幂等性
            .set("max.in.flight.requests.per.connection", "5");

        let producer: FutureProducer =
            client_config
                .create()
                .map_err(|e| KafkaError::ConfigError {
                    message: format!("创建 Kafka 生产者失败: {}", e),
                })?;

        info!("Kafka 生产者创建成功，连接到: {}", config.brokers.join(","));

        Ok(Self {
            producer,
            topic: config.completion_tasks_topic.clone(),
            config: config.clone(),
        })
    }

    /// 带重试的发送
    async fn send_with_retry(
        &self,
        payload: &str,
        partition_key: &str,
        retry_count: u32,
    ) -> KafkaResult<()> {
        let record = FutureRecord::to(&self.topic)
            .payload(payload)
            .key(partition_key);

        let timeout = Duration::from_millis(self.config.send_timeout_ms as u64);

        match self.producer.send(record, Timeout::After(timeout)).await {
            Ok(_) => {
                if retry_count > 0 {
                    info!("任务 {} 重试 {} 次后发送成功", partition_key, retry_count);
                }
                Ok(())
            }
            Err((kafka_err, _)) => {
                if retry_count < self.config.retry_count {
                    warn!(
                        "任务 {} 发送失败，第 {} 次重试: {}",
                        partition_key,
                        retry_count + 1,
                        kafka_err
                    );

                    // 指数退避
                    let delay = Duration::from_millis(100 * (2_u64.pow(retry_count)));
                    sleep(delay).await;

                    // 使用 Box::pin 来处理递归
                    return Box::pin(self.send_with_retry(
                        payload,
                        partition_key,
                        retry_count + 1,
                    ))
                    .await;
                }

                error!(
                    "任务 {} 发送失败，已达最大重试次数: {}",
                    partition_key, kafka_err
                );
                Err(KafkaError::ProducerError {
                    message: format!("发送失败: {}", kafka_err),
                })
            }
        }
    }

    /// 刷新生产者缓冲区
    pub async fn flush(&self) -> KafkaResult<()> {
        self.producer
            .flush(Timeout::After(Duration::from_secs(10)))
            .map_err(|e| KafkaError::ProducerError {
                message: format!("刷新生产者缓冲区失败: {}", e),
            })
    }
}

#[async_trait]
impl CompletionQueue for KafkaCompletionQueue {
    async fn enqueue(&self, task: CompletionTask) -> Result<(), QueueError> {
        let payload =
            serde_json::to_string(&task).map_err(|e| KafkaError::SerializationError {
                message: format!("序列化任务失败: {}", e),
            })?;

        let partition_key = task.message_id.to_string();
        self.send_with_retry(&payload, &partition_key, 0)
            .await
            .map_err(QueueError::from)
    }
}

impl Drop for KafkaCompletionQueue {
    fn drop(&mut self) {
        info!("Kafka 生产者正在关闭");
    }
}
