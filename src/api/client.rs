use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::models::RequestBody;
use super::response::parse_model_response;
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::models::Message;
use crate::session::{ChatModel, ModelResponse};

/// OpenAI-compatible `/chat/completions` client.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ChatClient {
    pub fn new(api_key: &str, endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ChatError::Config(format!("Invalid authorization header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_key,
            &config.api_endpoint,
            &config.model,
            Duration::from_secs(config.request_timeout),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn make_api_request(&self, request_body: &RequestBody) -> Result<Value> {
        debug!(model = %self.model, endpoint = %self.endpoint, messages = request_body.messages.len(), "chat request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout
                } else {
                    ChatError::Network(e)
                }
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "chat response status");

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let response_text = response.text().await?;
        debug!(raw = %response_text, "chat response body");

        Ok(serde_json::from_str(&response_text)?)
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<ModelResponse> {
        let request_body = RequestBody::new(&self.model, messages, tools);
        let response_json = self.make_api_request(&request_body).await?;
        parse_model_response(&response_json)
    }
}
