//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.mushaf/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::PageSource;
use crate::core::navigation::{FALLBACK_PAGE_COUNT, NavOptions};
use crate::core::progress::ProgressMode;
use crate::store::providers::DEFAULT_TIMEOUT_SECS;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MushafConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub source: Option<PageSource>,
    pub progress_mode: Option<ProgressMode>,
    pub fallback_page_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Directory for the saved session. Relative paths resolve against `~/.mushaf/`.
    pub dir: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source: PageSource,
    pub progress_mode: ProgressMode,
    pub fallback_page_count: u32,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub session_dir: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn nav_options(&self) -> NavOptions {
        NavOptions {
            progress_mode: self.progress_mode,
            fallback_page_count: self.fallback_page_count,
        }
    }
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

/// Returns `~/.mushaf/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mushaf"))
}

/// Returns the path to `~/.mushaf/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.mushaf/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MushafConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MushafConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MushafConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<MushafConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(MushafConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: MushafConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r#"# Mushaf Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# source = "remote"                  # "remote" or "demo" (or MUSHAF_SOURCE)
# progress_mode = "page"             # "page" or "corpus"
# fallback_page_count = 604          # used when the store cannot report a count

# [remote]
# base_url = "http://localhost:8080/v1"   # Or set MUSHAF_BASE_URL
# api_key = "..."                    # Or set MUSHAF_API_KEY
# timeout_secs = 10

# [session]
# dir = "sessions"                   # Relative to ~/.mushaf/
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Values that came from the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub source: Option<PageSource>,
    pub base_url: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MushafConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &MushafConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Source: CLI → env → config → default
    let source = cli
        .source
        .or_else(|| {
            env("MUSHAF_SOURCE").and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
                "remote" => Some(PageSource::Remote),
                "demo" => Some(PageSource::Demo),
                other => {
                    warn!("Ignoring unknown MUSHAF_SOURCE {:?}", other);
                    None
                }
            })
        })
        .or(config.general.source)
        .unwrap_or_default();

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("MUSHAF_BASE_URL"))
        .or_else(|| config.remote.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // API key: env → config
    let api_key = env("MUSHAF_API_KEY")
        .or_else(|| config.remote.api_key.clone())
        .filter(|k| !k.trim().is_empty());

    let fallback_page_count = match config.general.fallback_page_count {
        Some(0) => {
            warn!("fallback_page_count must be positive, using {}", FALLBACK_PAGE_COUNT);
            FALLBACK_PAGE_COUNT
        }
        Some(n) => n,
        None => FALLBACK_PAGE_COUNT,
    };

    let session_dir = config.session.dir.as_ref().map(|dir| {
        let dir = PathBuf::from(dir);
        match config_dir() {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir,
        }
    });

    ResolvedConfig {
        source,
        progress_mode: config.general.progress_mode.unwrap_or_default(),
        fallback_page_count,
        base_url,
        api_key,
        timeout: Duration::from_secs(config.remote.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        session_dir,
    }
}
