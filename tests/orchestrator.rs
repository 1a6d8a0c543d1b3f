mod common;

use serde_json::json;
use toolchat::error::ChatError;
use toolchat::models::{FailureKind, ToolCallRequest, Turn};
use toolchat::orchestrator::{LoopState, NoopObserver, Orchestrator, TurnObserver};
use toolchat::session::{ModelResponse, ModelSession};
use toolchat::tools::ToolRegistry;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{config_for_server, weather_call, ScriptedModel};

fn orchestrator(server: &MockServer, model: ScriptedModel) -> Orchestrator {
    let config = config_for_server(&server.uri());
    let registry = ToolRegistry::from_config(&config).unwrap();
    Orchestrator::with_model(&config, Box::new(model), registry)
}

async fn stub_weather(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 15.6}
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[derive(Default)]
struct RecordingObserver {
    states: Vec<LoopState>,
    calls: Vec<String>,
    results: Vec<bool>,
}

impl TurnObserver for RecordingObserver {
    fn on_state(&mut self, state: LoopState) {
        self.states.push(state);
    }

    fn on_tool_call(&mut self, call: &ToolCallRequest) {
        self.calls.push(call.tool_name.clone());
    }

    fn on_tool_result(&mut self, _call: &ToolCallRequest, result: &toolchat::models::LookupResult) {
        self.results.push(result.is_success());
    }
}

#[tokio::test]
async fn test_direct_answer_uses_no_tools() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (model, log) = ScriptedModel::new(vec![Ok(ModelResponse::text("Hello! How can I help?"))]);
    let mut orchestrator = orchestrator(&server, model);

    let outcome = orchestrator.run_turn("hi", &mut NoopObserver).await.unwrap();

    assert_eq!(outcome.reply, "Hello! How can I help?");
    assert_eq!(outcome.tool_rounds, 0);
    assert!(!outcome.limit_reached);
    assert_eq!(log.calls(), 1);
    assert_eq!(orchestrator.session().transcript().len(), 2);
}

#[tokio::test]
async fn test_single_tool_round() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 15.6}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (model, log) = ScriptedModel::new(vec![
        Ok(weather_call("London")),
        Ok(ModelResponse::text("It is clear, 15.6°C.")),
    ]);
    let mut orchestrator = orchestrator(&server, model);

    let outcome = orchestrator
        .run_turn("What's the weather in London?", &mut NoopObserver)
        .await
        .unwrap();

    assert_eq!(outcome.reply, "It is clear, 15.6°C.");
    assert_eq!(outcome.tool_rounds, 1);
    assert_eq!(log.calls(), 2);

    let turns = orchestrator.session().transcript().turns();
    assert_eq!(turns.len(), 4);
    assert!(matches!(&turns[0], Turn::UserMessage(text) if text == "What's the weather in London?"));
    assert!(matches!(&turns[1], Turn::ToolCallRequest(call) if call.tool_name == "get_weather"));
    match &turns[2] {
        Turn::ToolResult { call_id, result, .. } => {
            assert_eq!(call_id, "call_weather");
            assert_eq!(result.field("temperature"), Some(&json!(15.6)));
        }
        other => panic!("expected tool result, got {:?}", other),
    }
    assert!(matches!(&turns[3], Turn::AssistantMessage(text) if text == "It is clear, 15.6°C."));

    // The second model request carries exactly one tool result for the call
    let second = log.request(1);
    let tool_messages: Vec<_> = second.iter().filter(|m| m.role == "tool").collect();
    assert_eq!(tool_messages.len(), 1);
    assert_eq!(tool_messages[0].tool_call_id.as_deref(), Some("call_weather"));
    assert!(tool_messages[0].content.as_deref().unwrap().contains("clear sky"));
}

#[tokio::test]
async fn test_system_prompt_lists_registered_tools() {
    let server = MockServer::start().await;
    let (model, log) = ScriptedModel::new(vec![Ok(ModelResponse::text("ok"))]);
    let mut orchestrator = orchestrator(&server, model);

    orchestrator.run_turn("hi", &mut NoopObserver).await.unwrap();

    let first = log.request(0);
    assert_eq!(first[0].role, "system");
    let prompt = first[0].content.as_deref().unwrap();
    assert!(prompt.contains("get_weather"));
    assert!(prompt.contains("get_stock_price"));
}

#[tokio::test]
async fn test_round_limit_terminates_turn() {
    let server = MockServer::start().await;
    stub_weather(&server, 200, 3).await;

    let (model, log) = ScriptedModel::always(weather_call("London"));
    let mut orchestrator = orchestrator(&server, model).with_max_tool_rounds(3);

    let outcome = orchestrator
        .run_turn("Weather, forever", &mut NoopObserver)
        .await
        .unwrap();

    assert!(outcome.limit_reached);
    assert_eq!(outcome.tool_rounds, 3);
    assert_eq!(log.calls(), 4);
    assert!(outcome.reply.contains("3 tool calls"));

    let turns = orchestrator.session().transcript().turns();
    let requests = turns
        .iter()
        .filter(|t| matches!(t, Turn::ToolCallRequest(_)))
        .count();
    let results = turns
        .iter()
        .filter(|t| matches!(t, Turn::ToolResult { .. }))
        .count();
    assert_eq!(requests, 4);
    assert_eq!(results, 4);

    match &turns[turns.len() - 2] {
        Turn::ToolResult { result, .. } => assert_eq!(result.kind(), Some(FailureKind::RoundLimit)),
        other => panic!("expected round limit result, got {:?}", other),
    }
    assert!(matches!(turns.last(), Some(Turn::AssistantMessage(_))));
    assert_eq!(orchestrator.state(), LoopState::AwaitingUserInput);
}

#[tokio::test]
async fn test_network_failure_retried_once() {
    let server = MockServer::start().await;
    stub_weather(&server, 503, 2).await;

    let (model, _log) = ScriptedModel::new(vec![
        Ok(weather_call("London")),
        Ok(ModelResponse::text("The weather service is unavailable.")),
    ]);
    let mut orchestrator = orchestrator(&server, model);

    let outcome = orchestrator.run_turn("Weather?", &mut NoopObserver).await.unwrap();

    assert_eq!(outcome.reply, "The weather service is unavailable.");
    match &orchestrator.session().transcript().turns()[2] {
        Turn::ToolResult { result, .. } => assert_eq!(result.kind(), Some(FailureKind::NetworkError)),
        other => panic!("expected tool result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_network_retry_can_be_disabled() {
    let server = MockServer::start().await;
    stub_weather(&server, 503, 1).await;

    let (model, _log) = ScriptedModel::new(vec![
        Ok(weather_call("London")),
        Ok(ModelResponse::text("Unavailable.")),
    ]);
    let mut orchestrator = orchestrator(&server, model).with_network_retry(false);

    orchestrator.run_turn("Weather?", &mut NoopObserver).await.unwrap();
}

#[tokio::test]
async fn test_not_found_is_not_retried_and_not_fatal() {
    let server = MockServer::start().await;
    stub_weather(&server, 404, 1).await;

    let (model, log) = ScriptedModel::new(vec![
        Ok(weather_call("Atlantis")),
        Ok(ModelResponse::text("I couldn't find Atlantis.")),
    ]);
    let mut orchestrator = orchestrator(&server, model);

    let outcome = orchestrator.run_turn("Weather in Atlantis?", &mut NoopObserver).await.unwrap();

    assert_eq!(outcome.reply, "I couldn't find Atlantis.");
    let tool_message = log.request(1).pop().unwrap();
    assert!(tool_message.content.unwrap().contains("NotFound"));
}

#[tokio::test]
async fn test_unknown_tool_is_reported_to_model() {
    let server = MockServer::start().await;
    let (model, _log) = ScriptedModel::new(vec![
        Ok(ModelResponse::tool_call(ToolCallRequest::new(
            "call_x",
            "get_horoscope",
            json!({"sign": "leo"}),
        ))),
        Ok(ModelResponse::text("I can't read horoscopes.")),
    ]);
    let mut orchestrator = orchestrator(&server, model);

    let outcome = orchestrator.run_turn("My horoscope?", &mut NoopObserver).await.unwrap();

    assert_eq!(outcome.reply, "I can't read horoscopes.");
    match &orchestrator.session().transcript().turns()[2] {
        Turn::ToolResult { result, .. } => assert_eq!(result.kind(), Some(FailureKind::UnknownTool)),
        other => panic!("expected tool result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_model_failure_aborts_turn() {
    let server = MockServer::start().await;
    let (model, log) = ScriptedModel::new(vec![
        Err(ChatError::Upstream {
            status: 502,
            message: "bad gateway".to_string(),
        }),
        Ok(ModelResponse::text("Back again.")),
    ]);
    let mut orchestrator = orchestrator(&server, model);

    let err = orchestrator.run_turn("hello", &mut NoopObserver).await.unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::UpstreamError);
    assert_eq!(orchestrator.state(), LoopState::AwaitingUserInput);
    assert_eq!(orchestrator.session().transcript().len(), 1);

    // The session stays usable for the next question
    let outcome = orchestrator.run_turn("hello again", &mut NoopObserver).await.unwrap();
    assert_eq!(outcome.reply, "Back again.");
    assert_eq!(log.calls(), 2);
}

#[tokio::test]
async fn test_empty_model_reply_is_protocol_error() {
    let server = MockServer::start().await;
    let (model, _log) = ScriptedModel::new(vec![Ok(ModelResponse::default())]);
    let mut orchestrator = orchestrator(&server, model);

    let err = orchestrator.run_turn("hello", &mut NoopObserver).await.unwrap_err();
    assert!(matches!(err, ChatError::Protocol(_)));
}

#[tokio::test]
async fn test_only_first_tool_call_is_executed() {
    let server = MockServer::start().await;
    stub_weather(&server, 200, 1).await;
    Mock::given(path("/query"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let both = ModelResponse {
        content: None,
        tool_calls: vec![
            ToolCallRequest::new("call_a", "get_weather", json!({"city": "London"})),
            ToolCallRequest::new("call_b", "get_stock_price", json!({"symbol": "AAPL"})),
        ],
    };
    let (model, _log) = ScriptedModel::new(vec![Ok(both), Ok(ModelResponse::text("Done."))]);
    let mut orchestrator = orchestrator(&server, model);

    let outcome = orchestrator.run_turn("Both please", &mut NoopObserver).await.unwrap();

    assert_eq!(outcome.tool_rounds, 1);
    let turns = orchestrator.session().transcript().turns();
    assert!(matches!(&turns[1], Turn::ToolCallRequest(call) if call.id == "call_a"));
    assert_eq!(turns.len(), 4);
}

#[tokio::test]
async fn test_observer_sees_state_transitions() {
    let server = MockServer::start().await;
    stub_weather(&server, 200, 1).await;

    let (model, _log) = ScriptedModel::new(vec![
        Ok(weather_call("London")),
        Ok(ModelResponse::text("Clear.")),
    ]);
    let mut orchestrator = orchestrator(&server, model);
    let mut observer = RecordingObserver::default();

    orchestrator.run_turn("Weather?", &mut observer).await.unwrap();

    assert_eq!(
        observer.states,
        vec![
            LoopState::ModelThinking,
            LoopState::ToolExecuting,
            LoopState::ModelThinking,
            LoopState::Responding,
            LoopState::AwaitingUserInput,
        ]
    );
    assert_eq!(observer.calls, vec!["get_weather".to_string()]);
    assert_eq!(observer.results, vec![true]);
}

#[tokio::test]
async fn test_reset_clears_history() {
    let server = MockServer::start().await;
    let (model, log) = ScriptedModel::new(vec![
        Ok(ModelResponse::text("First.")),
        Ok(ModelResponse::text("Second.")),
    ]);
    let mut orchestrator = orchestrator(&server, model);

    orchestrator.run_turn("one", &mut NoopObserver).await.unwrap();
    orchestrator.reset();
    orchestrator.run_turn("two", &mut NoopObserver).await.unwrap();

    // system prompt plus the new question only
    assert_eq!(log.request(1).len(), 2);
}

#[tokio::test]
async fn test_session_refuses_to_send_with_pending_call() {
    let (model, log) = ScriptedModel::new(vec![Ok(ModelResponse::text("unreachable"))]);
    let mut session = ModelSession::new(Box::new(model), "system", Vec::new());

    session.push(Turn::UserMessage("Weather?".to_string()));
    session.push(Turn::ToolCallRequest(ToolCallRequest::new(
        "call_1",
        "get_weather",
        json!({"city": "London"}),
    )));

    let err = session.send().await.unwrap_err();
    assert!(matches!(err, ChatError::Protocol(_)));
    assert_eq!(log.calls(), 0);
}
