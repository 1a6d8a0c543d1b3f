mod builtins;
mod registry;

pub use builtins::Tool;
pub use registry::{format_tools_for_llm, ToolRegistry};
