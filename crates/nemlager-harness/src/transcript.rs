// crates/nemlager-harness/src/transcript.rs
// ============================================================================
// Module: Exchange Transcript
// Description: Ordered record of HTTP exchanges issued by a client.
// Purpose: Capture request/response pairs for artifacts and diagnostics.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every exchange made through an [`crate::ApiClient`] is appended to its
//! transcript. Credential-bearing JSON fields are replaced before storage so
//! transcripts can be written to disk as test artifacts.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Serialize;
use serde_json::Value;

/// JSON keys whose values are replaced in transcripts.
pub const REDACTED_KEYS: [&str; 3] = ["password", "jwt", "token"];

/// Placeholder written in place of redacted values.
pub const REDACTED: &str = "<redacted>";

/// One recorded HTTP exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based sequence within the transcript.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Request path including query.
    pub path: String,
    /// Response status when one was received.
    pub status: Option<u16>,
    /// Redacted request body.
    pub request: Value,
    /// Redacted response body (`null` when absent or not JSON).
    pub response: Value,
    /// Error message when the exchange failed.
    pub error: Option<String>,
}

/// Shared, append-only transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Recorded entries.
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an exchange, assigning the next sequence number.
    pub fn record(
        &self,
        method: &str,
        path: &str,
        status: Option<u16>,
        request: Value,
        response: Value,
        error: Option<String>,
    ) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            method: method.to_string(),
            path: path.to_string(),
            status,
            request: redact(request),
            response: redact(response),
            error,
        });
    }

    /// Returns a snapshot of the entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Replaces values of [`REDACTED_KEYS`] anywhere in a JSON tree.
#[must_use]
pub fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if REDACTED_KEYS.contains(&key.as_str()) && !value.is_null() {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, redact(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
