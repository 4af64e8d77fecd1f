//! Site configuration module.
//!
//! Handles loading, validating, and layering `site.toml`. Stock defaults are
//! the base layer; the user file overrides only the keys it names.
//!
//! ## Config File Location
//!
//! `site.toml` lives in the site root, next to the content directory:
//!
//! ```text
//! my-site/
//! ├── site.toml
//! ├── content/
//! │   ├── index.md
//! │   └── media/images/hyde.jpg
//! └── deploy/                  # generated
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_root = "content"      # Relative to the site root
//! deploy_root = "deploy"        # Relative to the site root
//! plugins = []                  # Ordered: "thumbnails", "digest"
//! ignore = ["*~", "*.bak", ".*"] # File name globs skipped by the scan
//!
//! [thumbnails]
//! prefix = "thumb_"             # Filename prefix for derived thumbnails
//! quality = 90                  # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file in the site root.
pub const CONFIG_FILENAME: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),
    #[error("Invalid ignore pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content directory, relative to the site root.
    pub content_root: String,
    /// Output directory, relative to the site root.
    pub deploy_root: String,
    /// Plugin names in registration order.
    pub plugins: Vec<String>,
    /// File name globs the content scan skips.
    pub ignore: Vec<String>,
    /// Thumbnail plugin settings.
    pub thumbnails: ThumbnailsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: "content".to_string(),
            deploy_root: "deploy".to_string(),
            plugins: Vec::new(),
            ignore: vec!["*~".to_string(), "*.bak".to_string(), ".*".to_string()],
            thumbnails: ThumbnailsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_root.is_empty() {
            return Err(ConfigError::Validation(
                "content_root must not be empty".into(),
            ));
        }
        if self.deploy_root.is_empty() {
            return Err(ConfigError::Validation(
                "deploy_root must not be empty".into(),
            ));
        }
        self.thumbnails.validate()
    }
}

/// Thumbnail plugin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Prepended to the source file name; the directory never changes.
    pub prefix: String,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            prefix: "thumb_".to_string(),
            quality: 90,
        }
    }
}

impl ThumbnailsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            // An empty prefix would write thumbnails over the primary output
            return Err(ConfigError::Validation(
                "thumbnails.prefix must not be empty".into(),
            ));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "thumbnails.prefix must not contain path separators".into(),
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel generation workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse config text layered over the stock defaults, then validate.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `site.toml` from the site root.
///
/// Returns the validated defaults when no file exists.
pub fn load_config(site_root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = site_root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// A documented stock `site.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# sitewright configuration
# Every option is optional; the values below are the defaults unless noted.

# Content directory, relative to this file.
content_root = "content"

# Output directory, relative to this file.
deploy_root = "deploy"

# Plugins in registration order. Hooks run in this order before generation
# and in reverse order after it.
# Available: "thumbnails", "digest"
plugins = ["thumbnails"]  # default: []

# File name globs skipped when scanning the content tree.
ignore = ["*~", "*.bak", ".*"]

[thumbnails]
# Prefix for thumbnail files, written in the source image's directory:
# media/images/hyde.jpg -> media/images/thumb_hyde.jpg
prefix = "thumb_"
# JPEG quality for thumbnails (1-100). Other formats are lossless.
quality = 90

[processing]
# Max parallel workers. Omit for one per CPU core; larger values are clamped.
# max_processes = 4
"#
}
