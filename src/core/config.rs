//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.illuminate/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Markup;
use crate::core::blocks::DEFAULT_CHARS_PER_ROW;
use crate::core::fragment::DEFAULT_PAGE_ID;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IlluminateConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub creole: CreoleConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub chars_per_row: Option<usize>,
    pub default_page: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub markup: Option<Markup>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreoleConfig {
    /// Extra or overriding interwiki prefixes.
    #[serde(default)]
    pub interwiki: BTreeMap<String, String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Narrowest row that still leaves one character per continuation row.
pub const MIN_CHARS_PER_ROW: usize = 3;

pub fn default_interwiki() -> BTreeMap<String, String> {
    [
        ("WikiCreole", "http://www.wikicreole.org/wiki/"),
        ("Wikipedia", "http://en.wikipedia.org/wiki/"),
        ("MDNCSS", "https://developer.mozilla.org/en-US/docs/CSS/"),
        (
            "MDNJavascript",
            "https://developer.mozilla.org/en/JavaScript/Reference/",
        ),
        ("MDN", "https://developer.mozilla.org/en/"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Where pages come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Http(String),
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub chars_per_row: usize,
    pub default_page: String,
    pub poll_interval_ms: u64,
    pub markup: Markup,
    pub source: SourceLocation,
    pub interwiki: BTreeMap<String, String>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub chars_per_row: Option<usize>,
    pub markup: Option<Markup>,
    pub base_url: Option<String>,
    pub root: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.illuminate/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".illuminate").join("config.toml"))
}

/// Load config from `~/.illuminate/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `IlluminateConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<IlluminateConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(IlluminateConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(IlluminateConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<IlluminateConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: IlluminateConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Illuminate Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# chars_per_row = 80           # Code column width; long lines wrap with ↩ / ↪
# default_page = "overview"    # Page shown for an empty fragment
# poll_interval_ms = 100       # How often the fragment is checked for changes
# markup = "creole"            # "creole" or "markdown"

# [source]
# base_url = "http://localhost:8000/src"   # Or set ILLUMINATE_BASE_URL
# root = "/path/to/project"                # Used when no base_url is set

# [creole.interwiki]
# RustDoc = "https://doc.rust-lang.org/std/"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &IlluminateConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Row width: CLI → env → config → default
    let requested_width = cli
        .chars_per_row
        .or_else(|| {
            std::env::var("ILLUMINATE_CHARS_PER_ROW")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or(config.general.chars_per_row);
    let chars_per_row = match requested_width {
        Some(width) if width < MIN_CHARS_PER_ROW => {
            warn!(
                "chars_per_row {} is below {}, using {}",
                width, MIN_CHARS_PER_ROW, DEFAULT_CHARS_PER_ROW
            );
            DEFAULT_CHARS_PER_ROW
        }
        Some(width) => width,
        None => DEFAULT_CHARS_PER_ROW,
    };

    // Source: CLI base URL → CLI root → env base URL → config base URL → config root → cwd
    let source = cli
        .base_url
        .clone()
        .map(SourceLocation::Http)
        .or_else(|| cli.root.clone().map(SourceLocation::Directory))
        .or_else(|| {
            std::env::var("ILLUMINATE_BASE_URL")
                .ok()
                .map(SourceLocation::Http)
        })
        .or_else(|| config.source.base_url.clone().map(SourceLocation::Http))
        .or_else(|| config.source.root.clone().map(SourceLocation::Directory))
        .unwrap_or_else(|| SourceLocation::Directory(PathBuf::from(".")));

    let mut interwiki = default_interwiki();
    interwiki.extend(
        config
            .creole
            .interwiki
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    ResolvedConfig {
        chars_per_row,
        default_page: config
            .general
            .default_page
            .clone()
            .unwrap_or_else(|| DEFAULT_PAGE_ID.to_string()),
        poll_interval_ms: config
            .general
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
        markup: cli.markup.or(config.general.markup).unwrap_or_default(),
        source,
        interwiki,
    }
}
