// crates/nemlager-harness/src/client.rs
// ============================================================================
// Module: API Client
// Description: Generic `get`/`post` helpers for the NemLager REST API.
// Purpose: Issue requests with caller-supplied setup and one result contract.
// Dependencies: reqwest, serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`ApiClient`] joins request paths onto the configured base URL, lets the
//! caller mutate each request before it is sent (typically to add an
//! `Authorization` header), and resolves the exchange into
//! `Result<ApiResponse<T>, ApiError>`:
//!
//! - no response (connect failure, timeout): error without status;
//! - status `>= 400`: the error envelope message, or a decode error when the
//!   error body is not JSON;
//! - status `< 400`: the decoded body, or a decode error.
//!
//! [`ApiClient::post_no_content`] skips decoding for endpoints that answer
//! with an empty body. Every exchange is appended to the client's transcript.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::HarnessConfig;
use crate::envelope::ErrorEnvelope;
use crate::error::ApiError;
use crate::error::ConfigError;
use crate::transcript::Transcript;
use crate::transcript::TranscriptEntry;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Successful exchange: status plus decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    /// Response status (always `< 400`).
    pub status: StatusCode,
    /// Decoded response body.
    pub body: T,
}

/// Status access shared by successful and failed exchanges.
pub trait ApiResultExt {
    /// Returns the response status, or `None` when no response arrived.
    fn status(&self) -> Option<StatusCode>;
}

impl<T> ApiResultExt for Result<ApiResponse<T>, ApiError> {
    fn status(&self) -> Option<StatusCode> {
        match self {
            Ok(response) => Some(response.status),
            Err(err) => err.status(),
        }
    }
}

impl ApiResultExt for Result<StatusCode, ApiError> {
    fn status(&self) -> Option<StatusCode> {
        match self {
            Ok(status) => Some(*status),
            Err(err) => err.status(),
        }
    }
}

/// Mutation applied to a request before it is sent.
pub trait RequestSetup {
    /// Returns the adjusted request.
    fn apply(self, request: RequestBuilder) -> RequestBuilder;
}

impl<F> RequestSetup for F
where
    F: FnOnce(RequestBuilder) -> RequestBuilder,
{
    fn apply(self, request: RequestBuilder) -> RequestBuilder {
        self(request)
    }
}

/// Authorization applied to a request.
///
/// # Invariants
/// - `Debug` output never includes tokens or secrets.
#[derive(Clone, PartialEq, Eq)]
pub enum RequestAuth {
    /// No `Authorization` header.
    None,
    /// User session token, sent as `bearer <token>`.
    User(String),
    /// Shared cron secret, sent as `Bearer <secret>`.
    CronSecret(String),
    /// Literal header value, for malformed-header checks.
    Raw(String),
}

impl RequestAuth {
    /// User token authorization.
    #[must_use]
    pub fn user(token: impl Into<String>) -> Self {
        Self::User(token.into())
    }

    /// Cron secret authorization.
    #[must_use]
    pub fn cron(secret: impl Into<String>) -> Self {
        Self::CronSecret(secret.into())
    }

    /// Returns the `Authorization` header value, if any.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::User(token) => Some(format!("bearer {token}")),
            Self::CronSecret(secret) => Some(format!("Bearer {secret}")),
            Self::Raw(value) => Some(value.clone()),
        }
    }
}

impl RequestSetup for RequestAuth {
    fn apply(self, request: RequestBuilder) -> RequestBuilder {
        match self.header_value() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }
}

impl std::fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::User(_) => f.write_str("User(<redacted>)"),
            Self::CronSecret(_) => f.write_str("CronSecret(<redacted>)"),
            Self::Raw(value) => f.debug_tuple("Raw").field(value).finish(),
        }
    }
}

/// Raw response captured before the body is interpreted.
struct Exchange {
    /// Request method.
    method: Method,
    /// Request path including query.
    path: String,
    /// Redacted-on-record request body.
    request: Value,
    /// Response status.
    status: StatusCode,
    /// Raw response bytes.
    body: Vec<u8>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Shared configuration; owns the base URL join.
    config: Arc<HarnessConfig>,
    /// Pooled reqwest client.
    http: Client,
    /// Exchange transcript.
    transcript: Transcript,
}

impl ApiClient {
    /// Creates a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] when the HTTP client cannot be built.
    pub fn new(config: &HarnessConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ConfigError::Client(err.to_string()))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Creates a client around an existing reqwest client.
    #[must_use]
    pub fn with_http_client(config: &HarnessConfig, http: Client) -> Self {
        Self {
            config: Arc::new(config.clone()),
            http,
            transcript: Transcript::new(),
        }
    }

    /// Returns a client sharing the connection pool with a fresh transcript.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            http: self.http.clone(),
            transcript: Transcript::new(),
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Returns a snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.entries()
    }

    /// Issues a GET and decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the module contract.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        setup: impl RequestSetup,
    ) -> Result<ApiResponse<T>, ApiError> {
        let exchange = self.send(Method::GET, path, None, setup).await?;
        let (status, body) = self.settle(exchange, decode_target)?;
        Ok(ApiResponse {
            status,
            body,
        })
    }

    /// Issues a POST with an optional JSON body and decodes the reply into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the module contract.
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: Option<&B>,
        setup: impl RequestSetup,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = encode_body(path, body)?;
        let exchange = self.send(Method::POST, path, payload, setup).await?;
        let (status, body) = self.settle(exchange, decode_target)?;
        Ok(ApiResponse {
            status,
            body,
        })
    }

    /// Issues a POST and returns only the status, leaving the body undecoded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the module contract; success bodies are never
    /// decoded.
    pub async fn post_no_content<B>(
        &self,
        path: &str,
        body: Option<&B>,
        setup: impl RequestSetup,
    ) -> Result<StatusCode, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let payload = encode_body(path, body)?;
        let exchange = self.send(Method::POST, path, payload, setup).await?;
        let (status, ()) = self.settle(exchange, |_, _| Ok(()))?;
        Ok(status)
    }

    /// Sends a request and reads the full response body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        setup: impl RequestSetup,
    ) -> Result<Exchange, ApiError> {
        let url = self.config.url_for(path);
        let parsed = Url::parse(&url).map_err(|err| ApiError::InvalidRequest {
            url: url.clone(),
            message: err.to_string(),
        })?;
        let mut request = self.http.request(method.clone(), parsed);
        if let Some(payload) = &payload {
            request = request.json(payload);
        }
        let request = setup.apply(request);
        let request_value = payload.unwrap_or(Value::Null);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let error = ApiError::from_reqwest(&url, &err);
                self.record_failure(&method, path, request_value, &error);
                return Err(error);
            }
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                let error = ApiError::from_reqwest(&url, &err);
                self.record_failure(&method, path, request_value, &error);
                return Err(error);
            }
        };
        debug!(method = %method, path, status = status.as_u16(), bytes = body.len(), "api exchange");
        Ok(Exchange {
            method,
            path: path.to_string(),
            request: request_value,
            status,
            body,
        })
    }

    /// Applies the status rules, decodes the body, and records the exchange.
    fn settle<T>(
        &self,
        exchange: Exchange,
        decode: impl FnOnce(StatusCode, &[u8]) -> Result<T, ApiError>,
    ) -> Result<(StatusCode, T), ApiError> {
        let Exchange {
            method,
            path,
            request,
            status,
            body,
        } = exchange;
        let outcome = if status.as_u16() >= 400 {
            Err(error_from_body(status, &body))
        } else {
            decode(status, &body)
        };
        self.transcript.record(
            method.as_str(),
            &path,
            Some(status.as_u16()),
            request,
            body_value(&body),
            outcome.as_ref().err().map(ToString::to_string),
        );
        outcome.map(|decoded| (status, decoded))
    }

    /// Records an exchange that produced no usable response.
    fn record_failure(&self, method: &Method, path: &str, request: Value, error: &ApiError) {
        debug!(method = %method, path, kind = error.kind(), "api exchange failed");
        self.transcript.record(
            method.as_str(),
            path,
            None,
            request,
            Value::Null,
            Some(error.to_string()),
        );
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serialises an optional request body into JSON.
fn encode_body<B: Serialize + ?Sized>(
    path: &str,
    body: Option<&B>,
) -> Result<Option<Value>, ApiError> {
    body.map(|body| {
        serde_json::to_value(body).map_err(|err| ApiError::InvalidRequest {
            url: path.to_string(),
            message: format!("body serialization failed: {err}"),
        })
    })
    .transpose()
}

/// Decodes a success body into the caller's target type.
fn decode_target<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Decode {
        status,
        message: err.to_string(),
    })
}

/// Builds the error for a `>= 400` response from its body.
fn error_from_body(status: StatusCode, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => ApiError::Status {
            status,
            message: envelope.message(status),
        },
        Err(err) => ApiError::Decode {
            status,
            message: err.to_string(),
        },
    }
}

/// Parses a body as JSON for the transcript, or `null` when it is not JSON.
fn body_value(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or(Value::Null)
}
