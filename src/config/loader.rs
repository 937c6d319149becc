//! Configuration discovery and loading.
//!
//! Resolution order: the `ARCHMAP_CONFIG` environment variable, then
//! `.archmap.toml` in the working directory. A missing file means defaults;
//! a file that parses but fails validation is a fatal setup error, reported
//! before any analysis starts.

use super::AnalysisConfig;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = ".archmap.toml";
pub const CONFIG_ENV_VAR: &str = "ARCHMAP_CONFIG";

static CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

/// Parse a TOML document into a validated, normalized config.
pub fn parse_and_validate_config(contents: &str) -> Result<AnalysisConfig> {
    let mut config: AnalysisConfig =
        toml::from_str(contents).context("failed to parse archmap configuration")?;
    config
        .validate()
        .map_err(|reason| anyhow!("invalid archmap configuration: {reason}"))?;
    config.normalize();
    Ok(config)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(custom));
    }
    let local = Path::new(CONFIG_FILE_NAME);
    local.exists().then(|| local.to_path_buf())
}

fn load_config() -> Result<AnalysisConfig> {
    match config_path() {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let config = parse_and_validate_config(&contents)?;
            debug!("loaded configuration from {}", path.display());
            Ok(config)
        }
        None => {
            debug!("no configuration file found, using defaults");
            Ok(AnalysisConfig::default())
        }
    }
}

/// Load, validate, and install the process-wide configuration.
///
/// Called once at startup; configuration errors abort before any analysis
/// phase runs.
pub fn init_config() -> Result<&'static AnalysisConfig> {
    if let Some(existing) = CONFIG.get() {
        return Ok(existing);
    }
    let config = load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// The installed configuration, or defaults when [`init_config`] was never
/// called (unit tests, library embedding).
pub fn get_config() -> &'static AnalysisConfig {
    CONFIG.get_or_init(AnalysisConfig::default)
}
