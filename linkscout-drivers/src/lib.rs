//! Browser automation layer for the search pipeline.
//!
//! This crate wraps a WebDriver session so the search core can drive one
//! browser the way a person would: paced navigation, human-like typing, and
//! a session fingerprint that keeps automation signals quiet.
//!
//! - [`scout_browser::driver::ScoutDriver`]: WebDriver client wrapper
//! - [`scout_browser::page::ScoutPage`]: DOM element helpers
//! - [`scout_browser::cadence::Cadence`]: human-like timings and typing
//! - [`scout_browser::hardening`]: Chrome flags, JS evasions, agent pool
pub mod scout_browser;
