// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: nemlager-harness
// ============================================================================

//! ## Overview
//! Process environment values only steer the test binaries: which env file
//! to read, the request timeout, where artifacts go, and which cases run.
//! API credentials always come from the env file. Values are parsed with
//! strict UTF-8 enforcement; invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use nemlager_harness::HarnessConfig;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Env file read when no override is set, relative to the crate directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional env-file path override.
    EnvFile,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional artifact run root override.
    RunRoot,
    /// Optional case-name filter (substring match).
    CaseFilter,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnvFile => "NEMLAGER_SYSTEM_TEST_ENV_FILE",
            Self::TimeoutSeconds => "NEMLAGER_SYSTEM_TEST_TIMEOUT_SEC",
            Self::RunRoot => "NEMLAGER_SYSTEM_TEST_RUN_ROOT",
            Self::CaseFilter => "NEMLAGER_SYSTEM_TEST_CASE_FILTER",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Env file holding `baseUrl`, `email`, `password`, `cronSecret`.
    pub env_file: PathBuf,
    /// Optional per-request timeout override.
    pub timeout: Option<Duration>,
    /// Optional artifact run root override.
    pub run_root: Option<PathBuf>,
    /// Runs only cases whose name contains this text.
    pub case_filter: Option<String>,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            timeout: None,
            run_root: None,
            case_filter: None,
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout).
    pub fn load() -> Result<Self, String> {
        let env_file = read_env_nonempty(SystemTestEnv::EnvFile.as_str())?
            .map_or_else(|| PathBuf::from(DEFAULT_ENV_FILE), PathBuf::from);
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let case_filter = read_env_nonempty(SystemTestEnv::CaseFilter.as_str())?;
        Ok(Self {
            env_file,
            timeout,
            run_root,
            case_filter,
        })
    }

    /// Reads the env file and applies the timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error when the env file is unreadable, malformed, or lacks
    /// a required key.
    pub fn harness_config(&self) -> Result<HarnessConfig, String> {
        let config = HarnessConfig::load(&self.env_file)
            .map_err(|err| format!("{}: {err}", self.env_file.display()))?;
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout).map_err(|err| err.to_string()),
            None => Ok(config),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
