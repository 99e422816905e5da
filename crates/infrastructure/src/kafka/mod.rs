//! Kafka 任务队列模块
//!
//! 提供回复生成任务的生产者和消费者实现，主题由配置显式指定。

pub mod consumer;
pub mod error;
pub mod producer;

// 重新导出
pub use consumer::*;
pub use error::*;
pub use producer::*;
