// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Artifact helpers for system-tests.
// Purpose: Create per-case run roots and write deterministic summaries.
// Dependencies: system-tests, nemlager-harness, serde, serde_jcs
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use nemlager_harness::CaseHooks;
use nemlager_harness::CaseOutcome;
use serde::Serialize;
use system_tests::config::SystemTestConfig;

#[derive(Debug, Serialize)]
struct CaseSummary {
    suite: String,
    case_name: String,
    status: String,
    started_at_ms: u64,
    ended_at_ms: u64,
    duration_ms: u64,
    failures: Vec<String>,
    notes: Vec<String>,
    artifacts: Vec<String>,
}

/// Wall-clock milliseconds, kept in `u64` so JCS can encode them.
fn now_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Turns a case name such as `GET /api/v1/settings` into a directory name.
pub fn case_dir_name(case_name: &str) -> String {
    let mut out = String::with_capacity(case_name.len());
    for ch in case_name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Artifact directory for one case.
#[derive(Debug, Clone)]
pub struct TestArtifacts {
    root: PathBuf,
}

impl TestArtifacts {
    /// Creates `<run root>/<suite>/<case>`.
    pub fn new(run_root: &Path, suite: &str, case_name: &str) -> io::Result<Self> {
        let root = run_root.join(suite).join(case_dir_name(case_name));
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Returns the root directory for the case artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes a text artifact with UTF-8 encoding.
    pub fn write_text(&self, name: &str, value: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, value.as_bytes())?;
        Ok(path)
    }
}

/// Writes one case summary, even when the case panics.
pub struct TestReporter {
    artifacts: TestArtifacts,
    suite: String,
    case_name: String,
    started_at_ms: u64,
    finalized: bool,
}

impl TestReporter {
    /// Creates a reporter for the named case.
    pub fn new(run_root: &Path, suite: &str, case_name: &str) -> io::Result<Self> {
        Ok(Self {
            artifacts: TestArtifacts::new(run_root, suite, case_name)?,
            suite: suite.to_string(),
            case_name: case_name.to_string(),
            started_at_ms: now_millis(),
            finalized: false,
        })
    }

    /// Returns the artifact manager.
    pub fn artifacts(&self) -> &TestArtifacts {
        &self.artifacts
    }

    /// Writes the transcript and final summary for a finished case.
    pub fn finish_outcome(&mut self, outcome: &CaseOutcome) -> io::Result<()> {
        self.artifacts.write_json("transcript.json", &outcome.transcript)?;
        let status = if outcome.passed() { "pass" } else { "fail" };
        self.finish(
            status,
            outcome.all_failures(),
            outcome.notes.clone(),
            vec!["transcript.json".to_string()],
        )
    }

    /// Writes the final summary for the case.
    pub fn finish(
        &mut self,
        status: &str,
        failures: Vec<String>,
        notes: Vec<String>,
        artifacts: Vec<String>,
    ) -> io::Result<()> {
        let ended_at_ms = now_millis();
        let summary = CaseSummary {
            suite: self.suite.clone(),
            case_name: self.case_name.clone(),
            status: status.to_string(),
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            failures,
            notes,
            artifacts,
        };
        self.artifacts.write_json("summary.json", &summary)?;
        self.artifacts.write_text("summary.md", &summary_markdown(&summary))?;
        self.finalized = true;
        Ok(())
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { "panic" } else { "unknown" };
        let _ = self.finish(
            status,
            Vec::new(),
            vec!["case terminated without explicit summary".to_string()],
            Vec::new(),
        );
    }
}

/// Case hooks that give every case its own reporter.
pub struct ArtifactHooks {
    run_root: PathBuf,
    suite: String,
    current: Mutex<Option<TestReporter>>,
}

impl ArtifactHooks {
    /// Resolves the run root from the environment, or `target/system-tests/run_<ms>`.
    pub fn new(suite: &str) -> Result<Self, String> {
        let config = SystemTestConfig::load()?;
        let run_root = config.run_root.unwrap_or_else(default_run_root);
        Ok(Self::with_root(run_root, suite))
    }

    /// Writes artifacts under an explicit run root.
    pub fn with_root(run_root: PathBuf, suite: &str) -> Self {
        Self {
            run_root,
            suite: suite.to_string(),
            current: Mutex::new(None),
        }
    }

    /// Returns the artifact directory for a case.
    pub fn case_root(&self, case_name: &str) -> PathBuf {
        self.run_root.join(&self.suite).join(case_dir_name(case_name))
    }
}

impl CaseHooks for ArtifactHooks {
    fn setup(&self, name: &str) {
        let reporter = match TestReporter::new(&self.run_root, &self.suite, name) {
            Ok(reporter) => Some(reporter),
            Err(err) => {
                tracing::warn!(case = name, error = %err, "artifact directory unavailable");
                None
            }
        };
        if let Ok(mut current) = self.current.lock() {
            *current = reporter;
        }
    }

    fn teardown(&self, outcome: &CaseOutcome) {
        let reporter = self.current.lock().ok().and_then(|mut current| current.take());
        if let Some(mut reporter) = reporter {
            if let Err(err) = reporter.finish_outcome(outcome) {
                tracing::warn!(case = %outcome.name, error = %err, "failed to write case artifacts");
            }
        }
    }
}

fn default_run_root() -> PathBuf {
    PathBuf::from("target/system-tests").join(format!("run_{}", now_millis()))
}

fn summary_markdown(summary: &CaseSummary) -> String {
    let mut out = String::new();
    out.push_str("# System-Test Summary\n\n");
    out.push_str("## Status\n\n");
    out.push_str(&format!("- Suite: {}\n", summary.suite));
    out.push_str(&format!("- Case: {}\n", summary.case_name));
    out.push_str(&format!("- Status: {}\n", summary.status));
    out.push_str(&format!("- Duration (ms): {}\n", summary.duration_ms));
    for (title, items) in [
        ("Failures", &summary.failures),
        ("Notes", &summary.notes),
        ("Artifacts", &summary.artifacts),
    ] {
        out.push_str(&format!("\n## {title}\n\n"));
        if items.is_empty() {
            out.push_str("- None\n");
        }
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
    }
    out
}
