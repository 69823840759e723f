// crates/nemlager-harness/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Typed configuration derived from the env file.
// Purpose: Pass base URL, credentials, and secrets explicitly to the harness.
// Dependencies: url
// ============================================================================

//! ## Overview
//! [`HarnessConfig`] is built from an [`EnvFile`] holding the four required
//! keys (`baseUrl`, `email`, `password`, `cronSecret`). It is handed to the
//! client and the authenticator explicitly instead of living in process
//! environment variables.
//!
//! Invariants:
//! - `base_url` is an absolute http(s) URL without a trailing slash.
//! - The timeout is always positive.
//! - `Debug` output never includes the password or the cron secret.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::auth::Credentials;
use crate::envfile::EnvFile;
use crate::error::ConfigError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Env-file key names consumed by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKey {
    /// API base URL.
    BaseUrl,
    /// Sign-in email.
    Email,
    /// Sign-in password.
    Password,
    /// Shared secret for cron endpoints.
    CronSecret,
}

impl EnvKey {
    /// All keys the harness requires.
    pub const REQUIRED: [Self; 4] = [Self::BaseUrl, Self::Email, Self::Password, Self::CronSecret];

    /// Returns the key name as written in the env file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "baseUrl",
            Self::Email => "email",
            Self::Password => "password",
            Self::CronSecret => "cronSecret",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Explicit harness configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Absolute API base URL without trailing slash.
    base_url: String,
    /// Sign-in credentials.
    credentials: Credentials,
    /// Shared cron secret.
    cron_secret: String,
    /// Per-request timeout.
    timeout: Duration,
}

impl HarnessConfig {
    /// Builds a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when `base_url` is not an
    /// absolute http(s) URL.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        cron_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            credentials,
            cron_secret: cron_secret.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Builds a configuration from parsed env-file entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] for absent or empty required keys
    /// and [`ConfigError::InvalidBaseUrl`] for an unusable base URL.
    pub fn from_env_file(env: &EnvFile) -> Result<Self, ConfigError> {
        let base_url = required(env, EnvKey::BaseUrl)?;
        let email = required(env, EnvKey::Email)?;
        let password = required(env, EnvKey::Password)?;
        let cron_secret = required(env, EnvKey::CronSecret)?;
        Self::new(base_url, Credentials::new(email, password), cron_secret)
    }

    /// Loads and validates the env file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is malformed, or
    /// lacks a required key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let env = EnvFile::load(path)?;
        Self::from_env_file(&env)
    }

    /// Overrides the per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when `timeout` is zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidEnv {
                name: "timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Returns the base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the sign-in credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the shared cron secret.
    #[must_use]
    pub fn cron_secret(&self) -> &str {
        &self.cron_secret
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins `path` (which may carry a query) onto the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("cron_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a required, non-empty env-file value.
fn required(env: &EnvFile, key: EnvKey) -> Result<&str, ConfigError> {
    match env.get(key.as_str()) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingKey(key.as_str())),
    }
}

/// Validates the base URL and strips trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::InvalidBaseUrl(format!("unsupported scheme '{other}'")));
        }
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl("missing host".to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
