//! Configuration management for Tidyflow.
//!
//! Provides runtime configuration for the pipeline runner.

use serde::{Deserialize, Serialize};

/// Global Tidyflow configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TidyflowConfig {
    /// Runner configuration.
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl TidyflowConfig {
    /// Parse a configuration document, filling absent fields with defaults.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Pipeline runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Record the persisted form of every executed stage.
    pub record_log: bool,
    /// Collect per-stage row counts and timings.
    pub collect_metrics: bool,
    /// Append debug detail to recorded error messages.
    pub error_detail: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            record_log: true,
            collect_metrics: true,
            error_detail: true,
        }
    }
}

impl RunnerConfig {
    /// Enable or disable the stage log.
    pub fn with_log(mut self, enabled: bool) -> Self {
        self.record_log = enabled;
        self
    }

    /// Enable or disable metrics collection.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.collect_metrics = enabled;
        self
    }

    /// Enable or disable debug detail in error messages.
    pub fn with_error_detail(mut self, enabled: bool) -> Self {
        self.error_detail = enabled;
        self
    }
}
