use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::builtins::Tool;
use crate::config::Config;
use crate::error::Result;
use crate::lookup::{LookupClient, StockProvider, WeatherProvider};
use crate::models::{FailureKind, LookupResult, ToolDescriptor};

struct RegisteredTool {
    descriptor: ToolDescriptor,
    schema: Value,
    tool: Tool,
}

/// Static mapping from tool name to handler. Registration order is the order
/// reported by [`ToolRegistry::describe`].
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for a resolved config. The weather tool is always
    /// offered when tools are enabled; the stock tool only with a key.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new();
        if !config.tools_enabled {
            info!("tools disabled");
            return Ok(registry);
        }

        let client = LookupClient::new(Duration::from_secs(config.lookup_timeout))?;

        registry.register(Tool::Weather(WeatherProvider::new(
            client.clone(),
            config.weather.clone(),
        )));

        match &config.stock {
            Some(settings) => {
                registry.register(Tool::StockPrice(StockProvider::new(client, settings.clone())))
            }
            None => info!("stock API key not set; get_stock_price disabled"),
        }

        Ok(registry)
    }

    /// Add a tool. A name that is already registered is ignored.
    pub fn register(&mut self, tool: Tool) {
        let descriptor = tool.descriptor();
        if self.get(&descriptor.name).is_some() {
            warn!(tool = %descriptor.name, "duplicate tool registration ignored");
            return;
        }

        let schema = descriptor.input_schema();
        self.tools.push(RegisteredTool {
            descriptor,
            schema,
            tool,
        });
    }

    pub fn describe(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.descriptor.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.find(name).map(|t| &t.tool)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn find(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.descriptor.name == name)
    }

    pub fn validate_arguments(&self, tool_name: &str, arguments: &Value) -> std::result::Result<(), String> {
        let tool = self
            .find(tool_name)
            .ok_or_else(|| format!("Tool '{}' not found", tool_name))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.schema)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(error_messages.join("; "));
        }

        Ok(())
    }

    /// Run a tool by name. Never fails: problems come back as
    /// `LookupResult::Failure`.
    pub async fn invoke(&self, name: &str, arguments: &Value) -> LookupResult {
        let Some(tool) = self.get(name) else {
            return LookupResult::failure(
                FailureKind::UnknownTool,
                format!(
                    "Unknown tool: {}. Available tools: {}",
                    name,
                    self.names().join(", ")
                ),
            );
        };

        if let Err(reason) = self.validate_arguments(name, arguments) {
            debug!(tool = name, %reason, "rejected tool arguments");
            return LookupResult::failure(
                FailureKind::InvalidInput,
                format!("Invalid arguments for '{}': {}", name, reason),
            );
        }

        tool.invoke(arguments).await
    }
}

/// Function specs for the chat API `tools` array.
pub fn format_tools_for_llm(registry: &ToolRegistry) -> Vec<Value> {
    registry
        .tools
        .iter()
        .map(|t| t.descriptor.to_function_spec())
        .collect()
}
