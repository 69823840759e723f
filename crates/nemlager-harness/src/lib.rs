// crates/nemlager-harness/src/lib.rs
// ============================================================================
// Module: NemLager Harness Library
// Description: Shared harness for black-box tests against the NemLager API.
// Purpose: Provide config loading, request helpers, auth, and a case runner.
// Dependencies: reqwest, serde, thiserror, tokio, tracing
// ============================================================================

//! ## Overview
//! The harness wraps a running NemLager REST API in a small, typed surface:
//! an env-file loader producing an explicit [`HarnessConfig`], generic JSON
//! envelope decoding, `get`/`post` helpers with a single status-plus-error
//! contract, a sign-in authenticator, and a sequential case runner that
//! distinguishes fatal from recorded failures.
//!
//! Nothing here mutates process-wide state; configuration is passed into the
//! client and authenticator explicitly.
//! Security posture: API responses are untrusted; secrets never reach logs
//! or transcripts in clear text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod checks;
pub mod client;
pub mod config;
pub mod envelope;
pub mod envfile;
pub mod error;
pub mod models;
pub mod runner;
pub mod telemetry;
pub mod transcript;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod test_server;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use auth::AuthData;
pub use auth::Credentials;
pub use auth::authenticate;
pub use client::ApiClient;
pub use client::ApiResponse;
pub use client::ApiResultExt;
pub use client::RequestAuth;
pub use client::RequestSetup;
pub use config::HarnessConfig;
pub use envelope::Envelope;
pub use envelope::ErrorEnvelope;
pub use envfile::EnvFile;
pub use error::ApiError;
pub use error::ConfigError;
pub use runner::CaseContext;
pub use runner::CaseFailure;
pub use runner::CaseHooks;
pub use runner::CaseOutcome;
pub use runner::CaseResult;
pub use runner::CaseStatus;
pub use runner::EndpointCase;
pub use runner::NoopHooks;
pub use runner::OrFatal;
pub use runner::SuiteReport;
pub use runner::SuiteRunner;
