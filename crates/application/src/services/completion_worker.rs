//! 回复生成 worker
//!
//! 从队列收到任务后调用外部补全 API 并把结果写回存储。
//! 单个任务的任何失败都被就地消化，绝不让消费循环崩溃；
//! API 失败被记录为数据（错误标记文本），存储失败在有限重试后放弃。

use domain::Message;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::completion::CompletionApi;
use crate::queue::CompletionTask;
use crate::repository::MessageRepository;

/// 回写存储的最大尝试次数
const STORE_WRITE_MAX_ATTEMPTS: u32 = 3;
/// 回写重试的基础退避时间
const STORE_WRITE_BACKOFF: Duration = Duration::from_millis(200);

/// 单个任务的处理结果，消费端据此记录日志并提交位移
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// 回复已写入存储
    Completed,
    /// 消息在回复落地前已被删除（例如先被清理），写入为 no-op
    MessageGone,
    /// 存储重试耗尽，消息保持未完成状态
    StoreFailed(String),
}

pub struct CompletionWorker {
    message_repository: Arc<dyn MessageRepository>,
    completion_api: Arc<dyn CompletionApi>,
}

impl CompletionWorker {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        completion_api: Arc<dyn CompletionApi>,
    ) -> Self {
        Self {
            message_repository,
            completion_api,
        }
    }

    /// 处理一个任务；永不 panic、永不向消费循环返回错误
    pub async fn handle(&self, task: CompletionTask) -> CompletionOutcome {
        // API 失败转为错误标记文本存入数据，而不是触发重投
        let response = match self.completion_api.complete(&task.content).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    message_id = %task.message_id,
                    error = %err,
                    "completion api call failed, recording error marker"
                );
                Message::error_marker(err)
            }
        };

        self.write_back(task.message_id, &response).await
    }

    /// 有限重试的回写；重复投递时重写同一终值是安全的
    async fn write_back(&self, message_id: uuid::Uuid, response: &str) -> CompletionOutcome {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self
                .message_repository
                .set_gemini_response(message_id, response)
                .await
            {
                Ok(true) => {
                    info!(%message_id, "gemini response persisted");
                    return CompletionOutcome::Completed;
                }
                Ok(false) => {
                    info!(%message_id, "message gone before completion landed, skipping");
                    return CompletionOutcome::MessageGone;
                }
                Err(err) => {
                    if attempt >= STORE_WRITE_MAX_ATTEMPTS {
                        error!(
                            %message_id,
                            error = %err,
                            attempts = attempt,
                            "store write-back failed, message stays pending"
                        );
                        return CompletionOutcome::StoreFailed(err.to_string());
                    }
                    let delay = STORE_WRITE_BACKOFF * 2u32.pow(attempt - 1);
                    warn!(%message_id, error = %err, attempt, "store write-back failed, retrying");
                    sleep(delay).await;
                }
            }
        }
    }
}
