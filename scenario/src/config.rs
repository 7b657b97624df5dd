//! Scenario Configuration File
//!
//! Optional TOML or YAML file; every section may be omitted.

use deployment::{DeploymentConfig, RemConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Deployment parameters
    #[serde(default)]
    pub deployment: DeploymentConfig,
    /// Random number generation
    #[serde(default)]
    pub random: RandomConfig,
    /// Radio environment map window
    #[serde(default)]
    pub rem: RemConfig,
    /// Artefacts to write
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Seed and run number
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RandomConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Run number; selects an independent substream set for the same seed
    #[serde(default = "default_run")]
    pub run: u32,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            run: default_run(),
        }
    }
}

fn default_seed() -> u64 {
    1
}

fn default_run() -> u32 {
    1
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory receiving every file
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Write buildings.txt, enbs.txt and ues.txt
    #[serde(default = "default_true")]
    pub gnuplot: bool,
    /// Scenario JSON file name; none disables it
    #[serde(default = "default_layout_file")]
    pub layout_file: Option<String>,
    /// Write the REM window next to the layout
    #[serde(default)]
    pub generate_rem: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            gnuplot: true,
            layout_file: default_layout_file(),
            generate_rem: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_layout_file() -> Option<String> {
    Some("layout.json".to_string())
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ScenarioConfig {
    /// Load from a `.yml`/`.yaml` file, anything else is read as TOML
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    /// Parse TOML
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Parse YAML
    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}
