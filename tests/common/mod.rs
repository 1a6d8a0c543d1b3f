#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use toolchat::cli::Args;
use toolchat::config::{Config, FileConfig};
use toolchat::error::{ChatError, Result};
use toolchat::models::{Message, ToolCallRequest};
use toolchat::session::{ChatModel, ModelResponse};

/// Resolve a config from explicit variables only.
pub fn config_with(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_sources(&Args::default(), &FileConfig::default(), |name| {
        vars.get(name).cloned()
    })
    .expect("test config resolves")
}

/// Config pointing both lookups at a mock server.
pub fn config_for_server(uri: &str) -> Config {
    let weather = format!("{}/data/2.5/weather", uri);
    let stock = format!("{}/query", uri);
    config_with(&[
        ("OPENROUTER_API_KEY", "test-chat-key"),
        ("WEATHER_API_KEY", "test-weather-key"),
        ("ALPHA_VANTAGE_API_KEY", "test-stock-key"),
        ("WEATHER_API_ENDPOINT", &weather),
        ("STOCK_API_ENDPOINT", &stock),
        ("LOOKUP_TIMEOUT", "2"),
    ])
}

/// Shared view into what a test model was asked.
#[derive(Clone, Default)]
pub struct RequestLog {
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl RequestLog {
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[index].clone()
    }

    fn record(&self, messages: &[Message]) {
        self.requests.lock().unwrap().push(messages.to_vec());
    }
}

/// Replays queued responses in order, then `fallback` forever if set.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<ModelResponse>>>,
    fallback: Option<ModelResponse>,
    log: RequestLog,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<ModelResponse>>) -> (Self, RequestLog) {
        let log = RequestLog::default();
        let model = Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            log: log.clone(),
        };
        (model, log)
    }

    pub fn always(response: ModelResponse) -> (Self, RequestLog) {
        let (mut model, log) = Self::new(Vec::new());
        model.fallback = Some(response);
        (model, log)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, messages: &[Message], _tools: &[Value]) -> Result<ModelResponse> {
        self.log.record(messages);
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }
        self.fallback
            .clone()
            .ok_or_else(|| ChatError::Protocol("script exhausted".to_string()))
    }
}

/// Requests `call` for a fresh question, then narrates the tool result.
pub struct NarratingModel {
    call: ToolCallRequest,
    log: RequestLog,
}

impl NarratingModel {
    pub fn new(tool: &str, arguments: Value) -> (Self, RequestLog) {
        let log = RequestLog::default();
        let model = Self {
            call: ToolCallRequest::new("call_1", tool, arguments),
            log: log.clone(),
        };
        (model, log)
    }
}

#[async_trait]
impl ChatModel for NarratingModel {
    async fn complete(&self, messages: &[Message], _tools: &[Value]) -> Result<ModelResponse> {
        self.log.record(messages);

        let last = messages.last().expect("at least one message");
        if last.role != "tool" {
            return Ok(ModelResponse::tool_call(self.call.clone()));
        }

        let content: Value = serde_json::from_str(last.content.as_deref().unwrap_or("{}"))?;
        if let Some(error) = content.get("error").and_then(|e| e.as_str()) {
            return Ok(ModelResponse::text(format!("Sorry, I couldn't look that up: {}", error)));
        }

        let text = if let Some(price) = content.get("price") {
            format!(
                "{} is trading at {} {}.",
                content["symbol"].as_str().unwrap_or("?"),
                price,
                content["currency"].as_str().unwrap_or("USD"),
            )
        } else {
            format!(
                "The weather in {} is {} at {}°C.",
                content["city"].as_str().unwrap_or("?"),
                content["description"].as_str().unwrap_or("?"),
                content["temperature"],
            )
        };
        Ok(ModelResponse::text(text))
    }
}

pub fn weather_call(city: &str) -> ModelResponse {
    ModelResponse::tool_call(ToolCallRequest::new(
        "call_weather",
        "get_weather",
        json!({ "city": city }),
    ))
}
