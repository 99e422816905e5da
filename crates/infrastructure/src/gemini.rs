//! Gemini generateContent 客户端
//!
//! 请求体只携带单轮用户文本，回复取第一个候选的第一段文本。
//! 超时和非 2xx 状态都会上抛，由 worker 决定如何记录失败。

use application::{CompletionApi, CompletionApiError};
use async_trait::async_trait;
use config::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct GeminiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, CompletionApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CompletionApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CompletionApi for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionApiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&self.api_url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CompletionApiError::Timeout
                } else {
                    CompletionApiError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| CompletionApiError::MalformedBody(err.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| {
                CompletionApiError::MalformedBody("response contains no candidates".to_string())
            })?;

        debug!(chars = text.len(), "gemini completion received");
        Ok(text)
    }
}
