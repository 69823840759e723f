// system-tests/src/lib.rs
// ============================================================================
// Module: NemLager System Tests Library
// Description: Shared configuration for the endpoint test binaries.
// Purpose: Resolve env-file location, timeout, and artifact root.
// Dependencies: nemlager-harness
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the NemLager system-tests
//! binaries in `system-tests/tests`.
//! Security posture: API responses are untrusted; credentials stay in the env
//! file and never reach artifacts in clear text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
