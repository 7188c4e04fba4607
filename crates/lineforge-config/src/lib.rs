//! Configuration system for LineForge.
//!
//! Load optimizer tuning from TOML or YAML files to control time limits,
//! captain candidate breadth, and search bounding without code changes.
//! Request-level settings (locks, stacks, lineup count) live in
//! `lineforge_core::OptimizationSettings`; this crate only tunes the engine.
//!
//! # Examples
//!
//! ```
//! use lineforge_config::OptimizerConfig;
//! use std::time::Duration;
//!
//! let config = OptimizerConfig::from_toml_str(r#"
//!     [termination]
//!     seconds_spent_limit = 20
//!
//!     [captain]
//!     candidate_count = 6
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(20));
//! assert_eq!(config.captain.candidate_count, 6);
//! ```
//!
//! The time limit applies to each lineup attempt. Showdown pools and Main
//! Slate pools of up to about 150 players usually solve a lineup in well
//! under a second. Full Main Slates of several hundred players can take
//! seconds per lineup in release builds; raise `seconds_spent_limit` or trim
//! the pool (`max_ownership`, exclusions) for those.
//!
//! Use default config when file is missing:
//!
//! ```
//! use lineforge_config::OptimizerConfig;
//!
//! let config = OptimizerConfig::load("lineforge.toml").unwrap_or_default();
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time limit applied per solve attempt when none is configured.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main optimizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizerConfig {
    #[serde(default)]
    pub termination: TerminationConfig,

    #[serde(default)]
    pub captain: CaptainConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl OptimizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.termination.seconds_spent_limit = None;
        self.termination.millis_spent_limit =
            Some(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination.node_limit = Some(nodes);
        self
    }

    pub fn with_candidate_count(mut self, count: usize) -> Self {
        self.captain.candidate_count = count;
        self
    }

    pub fn with_bounder(mut self, bounder: BounderType) -> Self {
        self.search.bounder = bounder;
        self
    }

    /// Per-attempt time limit, falling back to [`DEFAULT_TIME_LIMIT_SECS`].
    pub fn time_limit(&self) -> Duration {
        self.termination
            .time_limit()
            .unwrap_or(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.captain.candidate_count == 0 {
            return Err(ConfigError::Invalid(
                "captain.candidate_count must be at least 1".to_string(),
            ));
        }
        if self.search.termination_check_interval == 0 {
            return Err(ConfigError::Invalid(
                "search.termination_check_interval must be at least 1".to_string(),
            ));
        }
        if self.termination.node_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "termination.node_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Termination configuration, applied to each solve attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    pub seconds_spent_limit: Option<u64>,

    pub millis_spent_limit: Option<u64>,

    /// Maximum search nodes per attempt.
    pub node_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self
            .seconds_spent_limit
            .unwrap_or(0)
            .saturating_mul(1_000)
            .saturating_add(self.millis_spent_limit.unwrap_or(0));
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Captain candidate configuration (Showdown).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CaptainConfig {
    /// Top-K captains rotated across a batch.
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,
}

fn default_candidate_count() -> usize {
    5
}

impl Default for CaptainConfig {
    fn default() -> Self {
        Self {
            candidate_count: default_candidate_count(),
        }
    }
}

/// Branch-and-bound search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    #[serde(default)]
    pub bounder: BounderType,

    /// Nodes explored between termination checks.
    #[serde(default = "default_check_interval")]
    pub termination_check_interval: u64,
}

fn default_check_interval() -> u64 {
    256
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bounder: BounderType::default(),
            termination_check_interval: default_check_interval(),
        }
    }
}

/// Optimistic bound used to prune the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BounderType {
    /// Lagrangian relaxation of the roster-size and salary constraints.
    #[default]
    Lagrangian,

    /// Sum of the best remaining scores, ignoring salary.
    TopScore,
}

impl std::fmt::Display for BounderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BounderType::Lagrangian => write!(f, "Lagrangian"),
            BounderType::TopScore => write!(f, "TopScore"),
        }
    }
}
