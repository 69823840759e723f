// crates/nemlager-harness/src/telemetry.rs
// ============================================================================
// Module: Harness Logging
// Description: tracing subscriber setup for harness runs.
// Purpose: Route case notes and exchange logs through `tracing`.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Installs a fmt subscriber filtered by `RUST_LOG` (default `info`) and
//! written through the libtest capture writer, so output only shows for
//! failing tests or with `--nocapture`. Installing twice is a no-op.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Default filter when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global subscriber; returns false if one was already set.
pub fn init_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt().with_env_filter(filter).with_test_writer().with_target(false).try_init().is_ok()
}
