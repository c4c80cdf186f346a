//! Configuration loading from corlift.toml
//!
//! Analysis defaults can be specified in a `corlift.toml` file, discovered by
//! walking up from the current directory. CLI flags override file values.

use corlift_stats::{DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CONFIDENCE_LEVEL};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Corlift configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorliftConfig {
    /// Bootstrap defaults
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
    /// Output defaults
    #[serde(default)]
    pub output: OutputSettings,
}

/// Bootstrap defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// Number of bootstrap iterations
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Confidence level for intervals (e.g. 0.95)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    /// Run unseeded iterations in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            confidence_level: default_confidence_level(),
            seed: None,
            parallel: default_parallel(),
        }
    }
}

fn default_iterations() -> usize {
    DEFAULT_BOOTSTRAP_ITERATIONS
}
fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}
fn default_parallel() -> bool {
    true
}

/// Output defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl CorliftConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the current
    /// directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("corlift.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}
