use colored::*;

use crate::lookup::{GET_STOCK_PRICE, GET_WEATHER};
use crate::models::{LookupResult, ToolCallRequest};
use crate::orchestrator::{LoopState, TurnObserver};

/// Startup banner listing what the assistant can look up.
pub fn display_banner(tool_names: &[&str]) {
    println!("{}", "Chat assistant with tool calling".bold());
    if tool_names.is_empty() {
        println!("{}", "No lookup tools are enabled.".yellow());
    } else {
        println!("I can help you with:");
        for name in tool_names {
            let hint = match *name {
                GET_WEATHER => "weather information (ask about the weather in any city)",
                GET_STOCK_PRICE => "stock prices (ask about a ticker such as AAPL)",
                other => other,
            };
            println!("- {}", hint);
        }
    }
    println!(
        "{}",
        "Type 'exit', 'quit' or 'bye' to leave, '/reset' to start over.\n".dimmed()
    );
}

/// Show that a tool is about to run.
pub fn display_tool_call(call: &ToolCallRequest) {
    println!(
        "{}",
        format!("Calling tool: {} with args: {}", call.tool_name, call.arguments).cyan()
    );
}

pub fn display_tool_result(name: &str, summary: &str) {
    println!("{}", format!("[{}] {}", name, summary).dimmed());
}

pub fn display_tool_error(name: &str, error: &str) {
    println!("{}", format!("[{}] {}", name, error).yellow());
}

pub fn display_assistant(text: &str) {
    println!("\n{} {}\n", "Chatbot:".green().bold(), text.trim_end());
}

pub fn display_notice(text: &str) {
    println!("{} {}", "Chatbot:".green().bold(), text);
}

/// System-level failure banner. Never styled like an assistant reply.
pub fn display_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

/// Console rendering of orchestrator events.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TurnObserver for ConsoleObserver {
    fn on_state(&mut self, state: LoopState) {
        if self.verbose && state == LoopState::ModelThinking {
            eprintln!("{}", "Thinking...".dimmed());
        }
    }

    fn on_tool_call(&mut self, call: &ToolCallRequest) {
        display_tool_call(call);
    }

    fn on_tool_result(&mut self, call: &ToolCallRequest, result: &LookupResult) {
        if result.is_success() {
            display_tool_result(&call.tool_name, &result.summary());
        } else {
            display_tool_error(&call.tool_name, &result.summary());
        }
    }
}
