use crate::config::Config;
use crate::models::ToolDescriptor;

/// System instruction: today's date, the available tools, then any
/// configured extra prompt.
pub fn build_system_prompt(tools: &[ToolDescriptor], extra: Option<&str>) -> String {
    let mut prompt = format!(
        "You are a helpful assistant. Today's date is {}.\n",
        Config::get_current_date()
    );

    if tools.is_empty() {
        prompt.push_str("No tools are available; answer from your own knowledge.\n");
    } else {
        prompt.push_str(
            "You can call the following tools when the user needs live data. \
             Call at most one tool at a time. If a tool reports an error, explain \
             the problem to the user in plain language.\n",
        );
        for tool in tools {
            prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
        }
    }

    if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
        prompt.push('\n');
        prompt.push_str(extra);
        prompt.push('\n');
    }

    prompt
}
