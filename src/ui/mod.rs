mod output;

pub use output::{
    display_assistant, display_banner, display_error, display_notice, display_tool_call,
    display_tool_error, display_tool_result, ConsoleObserver,
};
