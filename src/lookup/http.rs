use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::models::{FailureKind, LookupResult};

/// Raw provider reply, before normalization.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Shared HTTP client for the lookup providers. Every request is bounded by
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: reqwest::Client,
}

impl LookupClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Perform exactly one GET. Transport faults come back as a
    /// `NetworkError` failure.
    pub async fn get(
        &self,
        service: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<RawResponse, LookupResult> {
        debug!(service, url, "lookup request");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_failure(service, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(service, &e))?;

        debug!(service, status = status.as_u16(), bytes = body.len(), "lookup response");
        Ok(RawResponse { status, body })
    }
}

fn transport_failure(service: &str, err: &reqwest::Error) -> LookupResult {
    let message = if err.is_timeout() {
        format!("Request timed out while connecting to the {} service.", service)
    } else if err.is_connect() {
        format!(
            "Unable to connect to the {} service. Please check your internet connection.",
            service
        )
    } else {
        format!("A request error occurred: {}", err)
    };
    LookupResult::failure(FailureKind::NetworkError, message)
}

/// Extract a required string argument, trimmed and non-empty.
pub fn required_text(args: &Value, name: &str) -> std::result::Result<String, LookupResult> {
    let raw = args.get(name).and_then(|v| v.as_str()).ok_or_else(|| {
        LookupResult::failure(
            FailureKind::InvalidInput,
            format!("Missing required argument: {}", name),
        )
    })?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LookupResult::failure(
            FailureKind::InvalidInput,
            format!("Argument '{}' must not be empty", name),
        ));
    }

    Ok(trimmed.to_string())
}
