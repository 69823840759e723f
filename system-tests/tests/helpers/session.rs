// system-tests/tests/helpers/session.rs
// ============================================================================
// Module: Suite Session
// Description: Wires config, logging, artifacts, and the case runner.
// Purpose: Give every test binary the same way to run the endpoint table.
// Dependencies: system-tests, nemlager-harness
// ============================================================================

use nemlager_harness::EndpointCase;
use nemlager_harness::HarnessConfig;
use nemlager_harness::SuiteReport;
use nemlager_harness::SuiteRunner;
use nemlager_harness::telemetry;
use system_tests::config::SystemTestConfig;

use super::artifacts::ArtifactHooks;

/// Loads the live API config from the env file named by the environment.
pub fn live_config() -> Result<(HarnessConfig, SystemTestConfig), String> {
    let settings = SystemTestConfig::load()?;
    let config = settings.harness_config()?;
    Ok((config, settings))
}

/// Runs `cases` in order, writing per-case artifacts through `hooks`.
pub async fn run_cases(
    config: HarnessConfig,
    cases: Vec<Box<dyn EndpointCase>>,
    hooks: ArtifactHooks,
    filter: Option<&str>,
) -> Result<SuiteReport, String> {
    telemetry::init_logging();
    let runner = SuiteRunner::new(config)
        .map_err(|err| err.to_string())?
        .with_cases(cases)
        .with_hooks(hooks);
    let report = runner.run_filtered(filter).await;
    tracing::info!(passed = report.passed(), "\n{}", report.summary());
    Ok(report)
}

/// Fails with the suite summary when any case failed.
pub fn require_passed(report: &SuiteReport) -> Result<(), String> {
    if report.passed() {
        return Ok(());
    }
    Err(format!("endpoint cases failed:\n{}", report.summary()))
}
