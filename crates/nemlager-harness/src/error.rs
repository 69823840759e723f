// crates/nemlager-harness/src/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Error taxonomy for API exchanges and configuration loading.
// Purpose: Keep transport, status, decode, and config failures distinct.
// Dependencies: reqwest, thiserror
// ============================================================================

//! ## Overview
//! [`ApiError`] classifies every way a single HTTP exchange can fail. Variants
//! that occur after a response arrived carry its status, so callers can
//! assert on status codes even when the exchange failed. There is no sentinel
//! status: a missing status means no response was received.
//!
//! [`ConfigError`] covers env-file and configuration validation failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

// ============================================================================
// SECTION: API Errors
// ============================================================================

/// Failure of a single API exchange.
///
/// # Invariants
/// - `Transport` and `Timeout` never carry a status.
/// - `Status` is only produced for statuses `>= 400`.
/// - String payloads may include untrusted server text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built (URL join or body serialisation).
    #[error("invalid request for {url}: {message}")]
    InvalidRequest {
        /// Target URL or path.
        url: String,
        /// Failure description.
        message: String,
    },
    /// Connection, DNS, or body read failure before a status was known.
    #[error("transport error for {url}: {message}")]
    Transport {
        /// Target URL.
        url: String,
        /// Failure description.
        message: String,
    },
    /// The per-request timeout expired.
    #[error("request to {url} timed out")]
    Timeout {
        /// Target URL.
        url: String,
    },
    /// The server answered with an error status and a decodable error body.
    #[error("{message}")]
    Status {
        /// Response status (always >= 400).
        status: StatusCode,
        /// Server-reported message.
        message: String,
    },
    /// A response body (success or error) was not the expected JSON.
    #[error("decode error (status {status}): {message}")]
    Decode {
        /// Response status.
        status: StatusCode,
        /// Decoder message.
        message: String,
    },
}

impl ApiError {
    /// Returns the response status when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status {
                status, ..
            }
            | Self::Decode {
                status, ..
            } => Some(*status),
            Self::InvalidRequest {
                ..
            }
            | Self::Transport {
                ..
            }
            | Self::Timeout {
                ..
            } => None,
        }
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest {
                ..
            } => "invalid_request",
            Self::Transport {
                ..
            } => "transport",
            Self::Timeout {
                ..
            } => "timeout",
            Self::Status {
                ..
            } => "status",
            Self::Decode {
                ..
            } => "decode",
        }
    }

    /// Maps a reqwest send/read failure onto the transport taxonomy.
    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                url: url.to_string(),
            };
        }
        Self::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Config Errors
// ============================================================================

/// Configuration and env-file failures.
///
/// # Invariants
/// - Messages never include secret values, only key names.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The env file could not be read.
    #[error("failed to read env file {path}: {source}")]
    Io {
        /// Env file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A non-blank line has no `=` separator or an empty key.
    #[error("invalid env line at #{line}: {reason}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// Why the line was rejected.
        reason: &'static str,
    },
    /// A required key is absent or empty.
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),
    /// `baseUrl` is not an absolute http(s) URL.
    #[error("invalid baseUrl: {0}")]
    InvalidBaseUrl(String),
    /// A process environment override is invalid.
    #[error("{name} {message}")]
    InvalidEnv {
        /// Environment variable name.
        name: &'static str,
        /// Validation message.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(String),
}
