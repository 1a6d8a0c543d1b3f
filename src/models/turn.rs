use super::lookup::LookupResult;
use super::message::Message;
use super::tool::ToolCallRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    UserMessage(String),
    ToolCallRequest(ToolCallRequest),
    ToolResult {
        call_id: String,
        tool_name: String,
        result: LookupResult,
    },
    AssistantMessage(String),
}

impl Turn {
    pub fn tool_result(call: &ToolCallRequest, result: LookupResult) -> Self {
        Turn::ToolResult {
            call_id: call.id.clone(),
            tool_name: call.tool_name.clone(),
            result,
        }
    }

    pub fn to_message(&self) -> Message {
        match self {
            Turn::UserMessage(text) => Message::user(text.clone()),
            Turn::AssistantMessage(text) => Message::assistant(text.clone()),
            Turn::ToolCallRequest(call) => Message {
                role: "assistant".to_string(),
                content: None,
                tool_calls: Some(vec![call.to_wire()]),
                tool_call_id: None,
            },
            Turn::ToolResult {
                call_id, result, ..
            } => Message::tool(call_id.clone(), result.render()),
        }
    }
}

/// Append-only history of one chat session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The trailing tool call that still lacks its result, if any.
    pub fn pending_tool_call(&self) -> Option<&ToolCallRequest> {
        match self.turns.last() {
            Some(Turn::ToolCallRequest(call)) => Some(call),
            _ => None,
        }
    }

    pub fn to_messages(&self) -> Vec<Message> {
        self.turns.iter().map(Turn::to_message).collect()
    }
}
