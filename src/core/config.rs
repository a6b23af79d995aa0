//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.edumilestone/config.toml` unless a path is given on
//! the command line. If the default file is missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::mapping::FeatureModuleMap;
use crate::modules::DEFAULT_HOOK_TIMEOUT;
use crate::navigation::RetryPolicy;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub modules: ModulesConfig,
    /// Feature → module table. Replaces the built-in mapping when non-empty.
    #[serde(default)]
    pub features: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    pub max_attempts: Option<u32>,
    pub initial_poll_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ModulesConfig {
    pub hook_timeout_ms: Option<u64>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub retry: RetryPolicy,
    pub hook_timeout: Duration,
    pub mapping: FeatureModuleMap,
}

/// Values taken from command-line flags (None = not specified).
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides {
    pub max_attempts: Option<u32>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.edumilestone/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".edumilestone").join("config.toml"))
}

/// Load config from the default location.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AppConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path. A missing file is an error here.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# EduMilestone Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [navigation]
# max_attempts = 3          # Load attempts per feature request before returning home
# initial_poll_ms = 200     # Pause after each load/unload before checking its status
# poll_interval_ms = 500    # Re-check interval while a module is loading/unloading

# [modules]
# hook_timeout_ms = 10000   # Longest a module may take to activate or deactivate

# [features]                # Feature → module table (replaces the built-in one)
# OCR = "Module01"
# PDF = "Module01"
# WORD = "Module01"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AppConfig, cli: CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &AppConfig,
    cli: CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let env_u64 = |key: &str| -> Option<u64> {
        let raw = env(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring {key}={raw:?}: not a number");
                None
            }
        }
    };

    let defaults = RetryPolicy::default();

    // Attempts: CLI → env → config → default. Zero would never navigate
    // to the feature, so it is lifted to one.
    let max_attempts = cli
        .max_attempts
        .or_else(|| env_u64("EDUMILESTONE_MAX_ATTEMPTS").map(|v| v as u32))
        .or(config.navigation.max_attempts)
        .unwrap_or(defaults.max_attempts)
        .max(1);

    let initial_poll = env_u64("EDUMILESTONE_INITIAL_POLL_MS")
        .or(config.navigation.initial_poll_ms)
        .map(Duration::from_millis)
        .unwrap_or(defaults.initial_poll);

    let poll_interval = env_u64("EDUMILESTONE_POLL_INTERVAL_MS")
        .or(config.navigation.poll_interval_ms)
        .map(Duration::from_millis)
        .unwrap_or(defaults.poll_interval);

    let hook_timeout = env_u64("EDUMILESTONE_HOOK_TIMEOUT_MS")
        .or(config.modules.hook_timeout_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_HOOK_TIMEOUT);

    let mapping = if config.features.is_empty() {
        FeatureModuleMap::default()
    } else {
        FeatureModuleMap::from_pairs(config.features.clone())
    };

    ResolvedConfig {
        retry: RetryPolicy {
            max_attempts,
            initial_poll,
            poll_interval,
        },
        hook_timeout,
        mapping,
    }
}
