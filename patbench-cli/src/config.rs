//! Configuration loading from patbench.toml
//!
//! Defaults for the runner and output can be kept in a `patbench.toml` file.
//! The file is discovered by walking up from the current directory, or given
//! explicitly with `--config`. Command-line flags override file values.

use anyhow::Context;
use patbench_report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "patbench.toml";

/// Patbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PatbenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Execution defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerConfig {
    /// Backend name: "seq", "thr", "omp" or "tbb"
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Worker count; 0 uses every available core
    #[serde(default)]
    pub threads: usize,
    /// Timed repetitions
    #[serde(default = "default_repeat")]
    pub repeat: usize,
    /// Untimed repetitions before measuring
    #[serde(default)]
    pub warmup: usize,
    /// Seed for generated inputs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            threads: 0,
            repeat: default_repeat(),
            warmup: 0,
            seed: None,
        }
    }
}

fn default_mode() -> String {
    "seq".to_string()
}
fn default_repeat() -> usize {
    1
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Report format: "human", "json" or "csv"
    #[serde(default)]
    pub format: OutputFormat,
    /// Directory for saved reports
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Save a JSON report into `directory` after each run
    #[serde(default)]
    pub save_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            directory: default_output_dir(),
            save_report: false,
        }
    }
}

fn default_output_dir() -> String {
    "target/patbench".to_string()
}

impl PatbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Find `patbench.toml` in `start` or any of its ancestors
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Explicit path if given, else the discovered file, else defaults
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd));
        match discovered {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using discovered config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Patbench Configuration

[runner]
# Backend: seq, thr, omp or tbb
mode = "seq"
# Worker threads (0 = all available cores)
threads = 0
# Timed repetitions per invocation
repeat = 1
# Untimed warmup repetitions
warmup = 0
# Seed for generated inputs (uncomment for reproducible data)
# seed = 42

[output]
# Report format: human, json or csv
format = "human"
# Directory for saved reports
directory = "target/patbench"
# Save a JSON report after each run
save_report = false
"#
        .to_string()
    }
}
