//! Common types shared across linkscout crates.
//!
//! This crate defines run configuration, observability helpers, and the
//! shared error type used throughout the workspace. It is intentionally
//! lightweight so that every other crate can depend on it.
//!
//! # Overview
//!
//! - [`ScoutConfig`]: Top-level run configuration
//! - [`GenerationConfig`]: Text-generation endpoint settings
//! - [`RecordPolicy`]: What to do with a record whose query generation fails
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`ScoutError`] and [`Result`]: Shared error handling

use serde::{Deserialize, Serialize};
use url::Url;

pub mod observability;

/// Settings for the text-generation endpoint used to produce search queries.
///
/// The endpoint is a full URL (Azure-style deployments embed the model and
/// API version in the path). The credential is passed via the `api-key`
/// header and must never be logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub endpoint: String,
    #[serde(skip_serializing, default)]
    pub api_key: String,
    pub temperature: f32,
}

impl GenerationConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            temperature: 0.7,
        }
    }
}

/// What the pipeline does with a record whose query generation fails with no
/// usable fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordPolicy {
    /// Exclude the record from the output entirely.
    Skip,
    /// Emit the record with `query` and `search_results` left null.
    IncludeWithNulls,
}

/// Configuration for one linkscout run.
///
/// Built by the binary from CLI arguments and environment variables, then
/// passed down explicitly; core logic never reads ambient process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    pub generation: GenerationConfig,
    /// WebDriver endpoint the browser session connects to.
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Maximum profile URLs collected per query.
    pub max_results: usize,
    pub on_generation_failure: RecordPolicy,
}

impl ScoutConfig {
    /// Check that the configured URLs parse before any work begins.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.generation.endpoint)
            .map_err(|e| ScoutError::Config(format!("invalid generation endpoint: {e}")))?;
        Url::parse(&self.webdriver_url)
            .map_err(|e| ScoutError::Config(format!("invalid webdriver url: {e}")))?;
        if self.max_results == 0 {
            return Err(ScoutError::Config("max_results must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::new("", ""),
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            max_results: 15,
            on_generation_failure: RecordPolicy::Skip,
        }
    }
}

/// Error types used across the linkscout workspace.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    /// The text-generation endpoint failed or returned something unusable.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The browser session reported an error.
    #[error("Browser error: {0}")]
    Browser(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;
