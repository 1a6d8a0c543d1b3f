use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{Message, ToolCallRequest};

/// What the remote model produced for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_call(call: ToolCallRequest) -> Self {
        Self {
            content: None,
            tool_calls: vec![call],
        }
    }
}

/// A remote chat model. One `complete` call is one outbound request.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<ModelResponse>;
}
