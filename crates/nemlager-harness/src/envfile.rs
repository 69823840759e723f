// crates/nemlager-harness/src/envfile.rs
// ============================================================================
// Module: Env File Loader
// Description: Strict `key=value` file parsing for harness settings.
// Purpose: Read local settings without touching the process environment.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The env file is a plain list of `key=value` lines: no quoting, no
//! comments. Blank lines are skipped, each other line splits on its first
//! `=`, and any line without a separator fails the whole load.
//!
//! Parsed values are returned as an [`EnvFile`] map instead of being written
//! into the process environment, so the harness has no hidden global state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Parsed contents of an env file.
///
/// # Invariants
/// - Keys are non-empty.
/// - Later duplicates replace earlier values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    /// Parsed entries keyed by name.
    entries: BTreeMap<String, String>,
}

impl EnvFile {
    /// Reads and parses the env file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::InvalidLine`] when a line is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Parses env file text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLine`] for a non-blank line without `=`
    /// or with an empty key.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (index, line) in raw.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: index + 1,
                    reason: "missing '=' separator",
                });
            };
            if key.is_empty() {
                return Err(ConfigError::InvalidLine {
                    line: index + 1,
                    reason: "empty key",
                });
            }
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(Self {
            entries,
        })
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the number of parsed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no entries were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values are secrets more often than not.
        f.debug_struct("EnvFile").field("keys", &self.entries.keys().collect::<Vec<_>>()).finish()
    }
}
