use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    InvalidInput,
    AuthError,
    NetworkError,
    NotFound,
    RateLimited,
    UnknownTool,
    UpstreamError,
    /// The per-turn tool round-trip bound was hit; the call was not executed.
    RoundLimit,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidInput => "InvalidInput",
            FailureKind::AuthError => "AuthError",
            FailureKind::NetworkError => "NetworkError",
            FailureKind::NotFound => "NotFound",
            FailureKind::RateLimited => "RateLimited",
            FailureKind::UnknownTool => "UnknownTool",
            FailureKind::UpstreamError => "UpstreamError",
            FailureKind::RoundLimit => "RoundLimit",
        };
        f.write_str(name)
    }
}

/// Outcome of a single tool invocation. Failures are data, never panics or
/// `Err`s, so the model can explain them.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Success(Map<String, Value>),
    Failure { kind: FailureKind, message: String },
}

impl LookupResult {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        LookupResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LookupResult::Success(_))
    }

    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            LookupResult::Success(_) => None,
            LookupResult::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            LookupResult::Success(fields) => fields.get(name),
            LookupResult::Failure { .. } => None,
        }
    }

    /// Text handed back to the model as the tool message content.
    pub fn render(&self) -> String {
        match self {
            LookupResult::Success(fields) => Value::Object(fields.clone()).to_string(),
            LookupResult::Failure { kind, message } => {
                json!({ "error": message, "kind": kind.to_string() }).to_string()
            }
        }
    }

    /// Short human-readable line for console display.
    pub fn summary(&self) -> String {
        match self {
            LookupResult::Success(fields) => fields
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => format!("{}: {}", k, s),
                    other => format!("{}: {}", k, other),
                })
                .collect::<Vec<_>>()
                .join(", "),
            LookupResult::Failure { kind, message } => format!("{}: {}", kind, message),
        }
    }
}
