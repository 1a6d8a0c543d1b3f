use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::models::{FunctionCall, ToolCall, ToolCallRequest};
use crate::session::ModelResponse;

fn first_message(response_json: &Value) -> Result<&Value> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ChatError::Protocol("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| ChatError::Protocol("Empty choices array".to_string()))?;

    first_choice
        .get("message")
        .ok_or_else(|| ChatError::Protocol("No message in response".to_string()))
}

/// Parse the tool calls of a non-streaming response, if present.
///
/// Entries without a function name are dropped; a missing id is replaced by a
/// generated one so the result can still be linked back.
pub fn parse_tool_calls(response_json: &Value) -> Result<Option<Vec<ToolCall>>> {
    let message = first_message(response_json)?;

    let Some(raw_calls) = message.get("tool_calls").and_then(|tc| tc.as_array()) else {
        return Ok(None);
    };

    let calls: Vec<ToolCall> = raw_calls
        .iter()
        .filter_map(|raw| {
            let function = raw.get("function");
            let name = function.and_then(|f| f.get("name")).and_then(|n| n.as_str());
            let Some(name) = name else {
                warn!("tool call without function name skipped");
                return None;
            };

            let id = raw
                .get("id")
                .and_then(|i| i.as_str())
                .filter(|i| !i.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple()));

            let arguments = match function.and_then(|f| f.get("arguments")) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => "{}".to_string(),
                Some(other) => other.to_string(),
            };

            Some(ToolCall {
                id,
                tool_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments,
                },
            })
        })
        .collect();

    if calls.is_empty() {
        Ok(None)
    } else {
        Ok(Some(calls))
    }
}

/// Extract content from a non-streaming response.
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

pub fn parse_model_response(response_json: &Value) -> Result<ModelResponse> {
    let tool_calls = parse_tool_calls(response_json)?
        .unwrap_or_default()
        .iter()
        .map(ToolCallRequest::from_wire)
        .collect();

    Ok(ModelResponse {
        content: extract_content(response_json)?,
        tool_calls,
    })
}
