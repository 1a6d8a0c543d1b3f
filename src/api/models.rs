use serde::Serialize;
use serde_json::Value;

use crate::models::Message;

#[derive(Debug, Serialize)]
pub struct RequestBody {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Ask for at most one tool call per reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
}

impl RequestBody {
    pub fn new(model: &str, messages: &[Message], tools: &[Value]) -> Self {
        let has_tools = !tools.is_empty();
        Self {
            model: model.to_string(),
            messages: messages.to_vec(),
            stream: false,
            tools: has_tools.then(|| tools.to_vec()),
            parallel_tool_calls: has_tools.then_some(false),
        }
    }
}
