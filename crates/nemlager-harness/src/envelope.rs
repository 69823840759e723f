// crates/nemlager-harness/src/envelope.rs
// ============================================================================
// Module: Response Envelopes
// Description: Uniform success and error wrappers returned by the API.
// Purpose: Decode `{msg, data}` and `{msg}` / `{error}` bodies generically.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! User-facing endpoints wrap payloads in `{"msg": .., "data": ..}` and
//! report failures as `{"msg": ..}`. Cron endpoints report failures as
//! `{"error": ..}` instead, so [`ErrorEnvelope`] accepts either field.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Success envelope carrying a typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Human-readable status message.
    #[serde(default)]
    pub msg: String,
    /// Typed payload.
    pub data: T,
}

/// Error body returned for statuses `>= 400`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Message used by user-facing endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Error used by cron endpoints; may be any JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ErrorEnvelope {
    /// Resolves the server message, falling back to the status reason.
    #[must_use]
    pub fn message(&self, status: StatusCode) -> String {
        if let Some(msg) = self.msg.as_deref().filter(|msg| !msg.is_empty()) {
            return msg.to_string();
        }
        match &self.error {
            Some(Value::String(text)) if !text.is_empty() => text.clone(),
            Some(Value::Null) | None => fallback_message(status),
            Some(Value::String(_)) => fallback_message(status),
            Some(other) => other.to_string(),
        }
    }
}

fn fallback_message(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(|| format!("http status {status}"), ToString::to_string)
}
