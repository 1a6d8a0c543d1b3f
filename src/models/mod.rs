mod lookup;
mod message;
mod tool;
mod turn;

pub use lookup::{FailureKind, LookupResult};
pub use message::Message;
pub use tool::{FunctionCall, ParamSpec, ParamType, ToolCall, ToolCallRequest, ToolDescriptor};
pub use turn::{Transcript, Turn};
