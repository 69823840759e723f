// crates/nemlager-harness/src/runner.rs
// ============================================================================
// Module: Case Runner
// Description: Sequential runner for named endpoint cases.
// Purpose: Isolate each case and separate fatal from recorded failures.
// Dependencies: async-trait, reqwest, serde, tracing
// ============================================================================

//! ## Overview
//! A [`SuiteRunner`] owns a static, ordered table of [`EndpointCase`]s and
//! runs them one at a time. Each case gets a fresh [`CaseContext`] with its
//! own client transcript, failure list, and notes, wrapped in a setup and
//! teardown hook pair.
//!
//! Failures come in two strengths:
//! - recorded ([`CaseContext::fail`], [`CaseContext::expect_status`]): the
//!   case keeps running so later diagnostics are still collected;
//! - fatal (`Err(CaseFailure)` returned from [`EndpointCase::run`]): the
//!   case stops immediately.
//!
//! A case passes only when it returns `Ok` and recorded nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::Instrument;
use tracing::info;
use tracing::info_span;
use tracing::warn;

use crate::auth::AuthData;
use crate::auth::authenticate;
use crate::client::ApiClient;
use crate::client::ApiResultExt;
use crate::client::RequestAuth;
use crate::config::HarnessConfig;
use crate::error::ApiError;
use crate::error::ConfigError;
use crate::transcript::TranscriptEntry;

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Result of running a case body.
pub type CaseResult = Result<(), CaseFailure>;

/// Fatal case failure; stops the case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// Failure description.
    message: String,
}

impl CaseFailure {
    /// Creates a fatal failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for CaseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CaseFailure {}

/// Converts any displayable error into a fatal failure with context.
pub trait OrFatal<T> {
    /// Maps the error into a [`CaseFailure`] prefixed with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`CaseFailure`] when `self` is an error.
    fn or_fatal(self, context: &str) -> Result<T, CaseFailure>;
}

impl<T, E: Display> OrFatal<T> for Result<T, E> {
    fn or_fatal(self, context: &str) -> Result<T, CaseFailure> {
        self.map_err(|err| CaseFailure::new(format!("{context}: {err}")))
    }
}

// ============================================================================
// SECTION: Case Trait
// ============================================================================

/// A named, self-contained endpoint scenario.
#[async_trait]
pub trait EndpointCase: Send + Sync {
    /// Case name, conventionally `METHOD /path`.
    fn name(&self) -> &'static str;

    /// Runs the scenario.
    async fn run(&self, ctx: &mut CaseContext) -> CaseResult;
}

/// Per-case setup and teardown hooks.
pub trait CaseHooks: Send + Sync {
    /// Runs before the case body.
    fn setup(&self, _name: &str) {}

    /// Runs after the case body with its outcome.
    fn teardown(&self, _outcome: &CaseOutcome) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl CaseHooks for NoopHooks {}

// ============================================================================
// SECTION: Case Context
// ============================================================================

/// State handed to one case run.
pub struct CaseContext {
    /// Case name.
    name: &'static str,
    /// Shared configuration.
    config: Arc<HarnessConfig>,
    /// Client with a case-local transcript.
    client: ApiClient,
    /// Recorded (non-fatal) failures.
    failures: Vec<String>,
    /// Diagnostic notes.
    notes: Vec<String>,
}

impl CaseContext {
    /// Creates a context for one case.
    #[must_use]
    pub const fn new(name: &'static str, config: Arc<HarnessConfig>, client: ApiClient) -> Self {
        Self {
            name,
            config,
            client,
            failures: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Returns the case name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the harness configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the case client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Signs in with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`CaseFailure`] when sign-in fails.
    pub async fn authenticate(&self) -> Result<AuthData, CaseFailure> {
        authenticate(&self.client, self.config.credentials()).await.or_fatal("error authenticating")
    }

    /// Returns user authorization for `auth`.
    #[must_use]
    pub fn user_auth(auth: &AuthData) -> RequestAuth {
        RequestAuth::user(auth.jwt.clone())
    }

    /// Returns authorization with the configured cron secret.
    #[must_use]
    pub fn cron_auth(&self) -> RequestAuth {
        RequestAuth::cron(self.config.cron_secret())
    }

    /// Records a diagnostic note.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(case = self.name, "{message}");
        self.notes.push(message);
    }

    /// Records a non-fatal failure; the case continues.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(case = self.name, "{message}");
        self.failures.push(message);
    }

    /// Records a failure unless `actual` equals `expected`.
    pub fn expect_status(&mut self, expected: StatusCode, actual: Option<StatusCode>) -> bool {
        if actual == Some(expected) {
            return true;
        }
        let actual = actual.map_or_else(|| "no response".to_string(), |status| status.to_string());
        self.fail(format!("expected status code {expected}, but got {actual}"));
        false
    }

    /// Asserts a rejected exchange: status is recorded, a missing error is fatal.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`CaseFailure`] when the exchange succeeded.
    pub fn expect_rejection<R>(
        &mut self,
        result: Result<R, ApiError>,
        expected: StatusCode,
        context: &str,
    ) -> Result<ApiError, CaseFailure>
    where
        Result<R, ApiError>: ApiResultExt,
    {
        self.expect_status(expected, result.status());
        match result {
            Ok(_) => Err(CaseFailure::new(format!("{context}: expected an error, but got none"))),
            Err(err) => Ok(err),
        }
    }

    /// Asserts a successful exchange: status is recorded, an error is fatal.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`CaseFailure`] when the exchange failed.
    pub fn expect_success<R>(
        &mut self,
        result: Result<R, ApiError>,
        expected: StatusCode,
        context: &str,
    ) -> Result<R, CaseFailure>
    where
        Result<R, ApiError>: ApiResultExt,
    {
        self.expect_status(expected, result.status());
        result.or_fatal(context)
    }

    /// Converts the finished context into an outcome.
    fn finish(self, fatal: Option<CaseFailure>, duration_ms: u64) -> CaseOutcome {
        let status = if fatal.is_none() && self.failures.is_empty() {
            CaseStatus::Passed
        } else {
            CaseStatus::Failed
        };
        CaseOutcome {
            name: self.name.to_string(),
            status,
            fatal: fatal.map(|failure| failure.message),
            failures: self.failures,
            notes: self.notes,
            duration_ms,
            transcript: self.client.transcript(),
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Final status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// No fatal or recorded failures.
    Passed,
    /// At least one failure.
    Failed,
}

/// Result of one case run.
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    /// Case name.
    pub name: String,
    /// Final status.
    pub status: CaseStatus,
    /// Fatal failure that stopped the case.
    pub fatal: Option<String>,
    /// Recorded failures.
    pub failures: Vec<String>,
    /// Diagnostic notes.
    pub notes: Vec<String>,
    /// Wall-clock duration.
    pub duration_ms: u64,
    /// Exchanges issued by the case.
    pub transcript: Vec<TranscriptEntry>,
}

impl CaseOutcome {
    /// Returns true when the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }

    /// Returns every failure message, fatal last.
    #[must_use]
    pub fn all_failures(&self) -> Vec<String> {
        let mut failures = self.failures.clone();
        failures.extend(self.fatal.iter().map(|fatal| format!("fatal: {fatal}")));
        failures
    }
}

/// Outcomes of a suite run, in table order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    /// Case outcomes.
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// Returns true when every case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    /// Returns the failed cases.
    #[must_use]
    pub fn failed(&self) -> Vec<&CaseOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed()).collect()
    }

    /// Looks up a case outcome by name.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    /// Renders a one-line-per-case summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let label = if outcome.passed() { "PASS" } else { "FAIL" };
            out.push_str(&format!("{label} {} ({} ms)\n", outcome.name, outcome.duration_ms));
            for failure in outcome.all_failures() {
                out.push_str(&format!("    {failure}\n"));
            }
        }
        out
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Sequential runner over a static case table.
pub struct SuiteRunner {
    /// Shared configuration.
    config: Arc<HarnessConfig>,
    /// Pool-owning client; each case gets a fork.
    client: ApiClient,
    /// Cases in run order.
    cases: Vec<Box<dyn EndpointCase>>,
    /// Per-case hooks.
    hooks: Box<dyn CaseHooks>,
}

impl SuiteRunner {
    /// Creates a runner with no cases and no-op hooks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] when the HTTP client cannot be built.
    pub fn new(config: HarnessConfig) -> Result<Self, ConfigError> {
        let client = ApiClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            cases: Vec::new(),
            hooks: Box::new(NoopHooks),
        })
    }

    /// Appends a case to the table.
    #[must_use]
    pub fn with_case(mut self, case: impl EndpointCase + 'static) -> Self {
        self.cases.push(Box::new(case));
        self
    }

    /// Appends several cases to the table.
    #[must_use]
    pub fn with_cases(mut self, cases: Vec<Box<dyn EndpointCase>>) -> Self {
        self.cases.extend(cases);
        self
    }

    /// Replaces the per-case hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl CaseHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Returns case names in run order.
    #[must_use]
    pub fn case_names(&self) -> Vec<&'static str> {
        self.cases.iter().map(|case| case.name()).collect()
    }

    /// Runs every case in table order.
    pub async fn run(&self) -> SuiteReport {
        self.run_filtered(None).await
    }

    /// Runs cases whose name contains `filter` (all when `None`).
    pub async fn run_filtered(&self, filter: Option<&str>) -> SuiteReport {
        let mut report = SuiteReport::default();
        for case in &self.cases {
            if filter.is_some_and(|filter| !case.name().contains(filter)) {
                continue;
            }
            let outcome = self.run_case(case.as_ref()).await;
            report.outcomes.push(outcome);
        }
        info!(
            cases = report.outcomes.len(),
            failed = report.failed().len(),
            "suite finished"
        );
        report
    }

    /// Runs one case in its own context.
    async fn run_case(&self, case: &dyn EndpointCase) -> CaseOutcome {
        let name = case.name();
        let span = info_span!("case", name);
        async {
            self.hooks.setup(name);
            info!("case started");
            let mut ctx = CaseContext::new(name, Arc::clone(&self.config), self.client.fork());
            let started = Instant::now();
            let result = case.run(&mut ctx).await;
            if let Err(failure) = &result {
                warn!(fatal = %failure, "case stopped");
            }
            let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let outcome = ctx.finish(result.err(), elapsed);
            info!(status = ?outcome.status, duration_ms = outcome.duration_ms, "case finished");
            self.hooks.teardown(&outcome);
            outcome
        }
        .instrument(span)
        .await
    }
}
