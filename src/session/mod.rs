mod model;
mod prompt;

pub use model::{ChatModel, ModelResponse};
pub use prompt::build_system_prompt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ChatError, Result};
use crate::models::{Message, ToolCallRequest, Transcript, Turn};

/// The model's decision for one `send`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Assistant(String),
    ToolCall(ToolCallRequest),
}

/// Owns the transcript and the remote model for one chat session.
pub struct ModelSession {
    model: Box<dyn ChatModel>,
    system_prompt: String,
    tools: Vec<Value>,
    transcript: Transcript,
}

impl ModelSession {
    pub fn new(model: Box<dyn ChatModel>, system_prompt: impl Into<String>, tools: Vec<Value>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            tools,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn push(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Send the transcript to the model and record its reply.
    ///
    /// At most one tool call is returned; extra calls in the same reply are
    /// dropped.
    pub async fn send(&mut self) -> Result<ModelReply> {
        if let Some(call) = self.transcript.pending_tool_call() {
            return Err(ChatError::Protocol(format!(
                "tool call '{}' ({}) has no result yet",
                call.tool_name, call.id
            )));
        }

        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(self.transcript.to_messages());

        let response = self.model.complete(&messages, &self.tools).await?;

        let mut calls = response.tool_calls.into_iter();
        let first_call = calls.next();
        for extra in calls {
            warn!(tool = %extra.tool_name, "ignoring additional tool call in the same reply");
        }

        let reply = match first_call {
            Some(call) => {
                debug!(tool = %call.tool_name, id = %call.id, "model requested tool");
                ModelReply::ToolCall(call)
            }
            None => match response.content {
                Some(text) if !text.trim().is_empty() => ModelReply::Assistant(text),
                _ => {
                    return Err(ChatError::Protocol(
                        "model returned neither text nor a tool call".to_string(),
                    ))
                }
            },
        };

        self.transcript.push(match &reply {
            ModelReply::Assistant(text) => Turn::AssistantMessage(text.clone()),
            ModelReply::ToolCall(call) => Turn::ToolCallRequest(call.clone()),
        });

        Ok(reply)
    }
}
