//! Drives one user turn: model, optional tool round-trips, final answer.

use tracing::{debug, info, warn};

use crate::api::ChatClient;
use crate::config::{Config, DEFAULT_MAX_TOOL_ROUNDS};
use crate::error::Result;
use crate::models::{FailureKind, LookupResult, ToolCallRequest, Turn};
use crate::session::{build_system_prompt, ChatModel, ModelReply, ModelSession};
use crate::tools::{format_tools_for_llm, ToolRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingUserInput,
    ModelThinking,
    ToolExecuting,
    Responding,
}

/// Hooks for a presentation shell. All methods default to no-ops.
pub trait TurnObserver {
    fn on_state(&mut self, _state: LoopState) {}
    fn on_tool_call(&mut self, _call: &ToolCallRequest) {}
    fn on_tool_result(&mut self, _call: &ToolCallRequest, _result: &LookupResult) {}
}

pub struct NoopObserver;

impl TurnObserver for NoopObserver {}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    pub tool_rounds: usize,
    pub limit_reached: bool,
}

pub struct Orchestrator {
    session: ModelSession,
    registry: ToolRegistry,
    max_tool_rounds: usize,
    retry_network_once: bool,
    state: LoopState,
}

impl Orchestrator {
    pub fn new(session: ModelSession, registry: ToolRegistry) -> Self {
        Self {
            session,
            registry,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            retry_network_once: true,
            state: LoopState::AwaitingUserInput,
        }
    }

    /// Wire up the real chat client and tools from a resolved config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = ToolRegistry::from_config(config)?;
        let model = ChatClient::from_config(config)?;
        Ok(Self::with_model(config, Box::new(model), registry))
    }

    /// Like [`Orchestrator::from_config`] with a caller-supplied model.
    pub fn with_model(config: &Config, model: Box<dyn ChatModel>, registry: ToolRegistry) -> Self {
        let system_prompt = build_system_prompt(&registry.describe(), config.system_prompt.as_deref());
        let session = ModelSession::new(model, system_prompt, format_tools_for_llm(&registry));

        Self::new(session, registry)
            .with_max_tool_rounds(config.max_tool_rounds)
            .with_network_retry(config.retry_network_once)
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds.max(1);
        self
    }

    pub fn with_network_retry(mut self, enabled: bool) -> Self {
        self.retry_network_once = enabled;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn session(&self) -> &ModelSession {
        &self.session
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn max_tool_rounds(&self) -> usize {
        self.max_tool_rounds
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.state = LoopState::AwaitingUserInput;
    }

    /// Run one user turn to completion.
    ///
    /// Tool failures are fed back to the model. A model failure aborts the
    /// turn and is returned as `Err`.
    pub async fn run_turn(
        &mut self,
        text: &str,
        observer: &mut dyn TurnObserver,
    ) -> Result<TurnOutcome> {
        self.session.push(Turn::UserMessage(text.to_string()));
        self.transition(LoopState::ModelThinking, observer);

        let mut tool_rounds = 0;
        loop {
            let reply = match self.session.send().await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(error = %e, "model call failed; turn aborted");
                    self.transition(LoopState::AwaitingUserInput, observer);
                    return Err(e);
                }
            };

            let call = match reply {
                ModelReply::Assistant(text) => {
                    self.transition(LoopState::Responding, observer);
                    self.transition(LoopState::AwaitingUserInput, observer);
                    return Ok(TurnOutcome {
                        reply: text,
                        tool_rounds,
                        limit_reached: false,
                    });
                }
                ModelReply::ToolCall(call) => call,
            };

            if tool_rounds >= self.max_tool_rounds {
                return Ok(self.finish_at_limit(&call, observer));
            }

            tool_rounds += 1;
            self.transition(LoopState::ToolExecuting, observer);
            observer.on_tool_call(&call);

            let result = self.execute(&call).await;
            observer.on_tool_result(&call, &result);
            self.session.push(Turn::tool_result(&call, result));

            self.transition(LoopState::ModelThinking, observer);
        }
    }

    async fn execute(&self, call: &ToolCallRequest) -> LookupResult {
        debug!(tool = %call.tool_name, arguments = %call.arguments, "executing tool");
        let result = self.registry.invoke(&call.tool_name, &call.arguments).await;

        if self.retry_network_once && result.kind() == Some(FailureKind::NetworkError) {
            info!(tool = %call.tool_name, "network failure; retrying once");
            return self.registry.invoke(&call.tool_name, &call.arguments).await;
        }

        result
    }

    /// Close a turn whose model keeps asking for tools. The pending call is
    /// answered with a `RoundLimit` failure so every request keeps its result.
    fn finish_at_limit(
        &mut self,
        call: &ToolCallRequest,
        observer: &mut dyn TurnObserver,
    ) -> TurnOutcome {
        warn!(limit = self.max_tool_rounds, tool = %call.tool_name, "tool round limit reached");

        let skipped = LookupResult::failure(
            FailureKind::RoundLimit,
            format!(
                "Not executed: the limit of {} tool calls per question was reached.",
                self.max_tool_rounds
            ),
        );
        self.session.push(Turn::tool_result(call, skipped));

        let reply = format!(
            "I stopped after {} tool calls without reaching an answer. \
             Please try rephrasing your question or asking for one thing at a time.",
            self.max_tool_rounds
        );
        self.session.push(Turn::AssistantMessage(reply.clone()));

        self.transition(LoopState::Responding, observer);
        self.transition(LoopState::AwaitingUserInput, observer);

        TurnOutcome {
            reply,
            tool_rounds: self.max_tool_rounds,
            limit_reached: true,
        }
    }

    fn transition(&mut self, next: LoopState, observer: &mut dyn TurnObserver) {
        debug!(from = ?self.state, to = ?next, "state change");
        self.state = next;
        observer.on_state(next);
    }
}
