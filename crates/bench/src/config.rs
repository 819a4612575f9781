use config::{Config as ConfigLoader, Environment, File, Map};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use super::error::Error;
use common::types::TraversalMode;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "PROBER_CONFIG";

/// Which report the driver produces.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Aligned vs. unaligned comparison for a fixed list of access counts.
    #[default]
    Compare,
    /// Comma-separated sweeps over every access count below a bound, for plotting.
    Graph,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompareConfig {
    pub runs: usize,
    pub access_counts: Vec<usize>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            runs: 1_000_000,
            access_counts: vec![16, 32, 64, 128, 256, 512, 1024],
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SweepPass {
    pub bound: usize,
    pub traversal: TraversalMode,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SweepConfig {
    pub runs: usize,
    pub passes: Vec<SweepPass>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            passes: vec![
                SweepPass {
                    bound: 1024,
                    traversal: TraversalMode::Strided,
                },
                SweepPass {
                    bound: 1024,
                    traversal: TraversalMode::PointerChase,
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub mode: RunMode,
    pub compare: CompareConfig,
    pub sweep: SweepConfig,
}

impl Config {
    /// Largest access count any report of the selected mode will probe.
    pub fn max_accesses(&self) -> usize {
        match self.mode {
            RunMode::Compare => self.compare.access_counts.iter().copied().max().unwrap_or(0),
            RunMode::Graph => self
                .sweep
                .passes
                .iter()
                .map(|pass| pass.bound.saturating_sub(1))
                .max()
                .unwrap_or(0),
        }
    }

    fn validate(self) -> Result<Self, Error> {
        if self.compare.runs == 0 {
            return Err(Error::ConfigLoadError(
                "compare.runs must be greater than zero".to_string(),
            ));
        }
        if self.sweep.runs == 0 {
            return Err(Error::ConfigLoadError(
                "sweep.runs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Loads configuration from an optional file and environment variables.
///
/// The file is `PROBER_CONFIG` when set (and must exist), otherwise
/// `crates/bench/Config.toml` under the working directory if present.
pub fn load_config() -> Result<Config, Error> {
    let vars: Map<String, String> = env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect();
    load_config_from(vars)
}

/// Same as [`load_config`], reading variables from `vars` instead of the process environment.
fn load_config_from(vars: Map<String, String>) -> Result<Config, Error> {
    let (config_file_path, required) = match vars.get(CONFIG_PATH_VAR) {
        Some(path) => (PathBuf::from(path), true),
        None => {
            let base_path = env::current_dir().map_err(|e| {
                Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
            })?;
            (base_path.join("crates").join("bench").join("Config.toml"), false)
        }
    };

    if required && !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at path: {}",
            config_file_path.display()
        )));
    }

    load_from(config_file_path, required, vars)
}

fn load_from(
    config_file_path: PathBuf,
    required: bool,
    vars: Map<String, String>,
) -> Result<Config, Error> {
    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix("PROBER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("compare.access_counts")
                .source(Some(vars)),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    app_config.validate()
}
