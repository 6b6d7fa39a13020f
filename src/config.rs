//! Excerpt configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's file in the source directory; the file only needs
//! the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [excerpt]
//! max_length = 200          # Summary length in characters (0 = never truncate)
//! code_snippet_limit = 50   # Characters of a code block shown in previews
//!
//! [locales]
//! default = "en"            # Locale for exports without a locale suffix
//! available = ["en", "ru"]  # Locales recognised in export file names
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::normalize::{CODE_SNIPPET_LIMIT, DEFAULT_MAX_LENGTH, Normalizer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Summary and code snippet lengths.
    pub excerpt: ExcerptConfig,
    /// Locales the site publishes in.
    pub locales: LocaleConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.excerpt.code_snippet_limit == 0 {
            return Err(ConfigError::Validation(
                "excerpt.code_snippet_limit must be greater than 0".into(),
            ));
        }
        if self.locales.available.is_empty() {
            return Err(ConfigError::Validation(
                "locales.available must not be empty".into(),
            ));
        }
        if !self.locales.available.contains(&self.locales.default) {
            return Err(ConfigError::Validation(format!(
                "locales.default {:?} is not listed in locales.available",
                self.locales.default
            )));
        }
        Ok(())
    }
}

/// Excerpt lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcerptConfig {
    /// Maximum summary length in characters. `0` disables truncation.
    pub max_length: usize,
    /// Maximum characters of a code block in previews.
    pub code_snippet_limit: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            code_snippet_limit: CODE_SNIPPET_LIMIT,
        }
    }
}

/// Summary limit for a configured or command-line length; `0` means none.
pub fn length_limit(max_length: usize) -> Option<usize> {
    (max_length > 0).then_some(max_length)
}

impl ExcerptConfig {
    /// Summary limit as passed to the normalizer.
    pub fn max_length(&self) -> Option<usize> {
        length_limit(self.max_length)
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.code_snippet_limit)
    }
}

/// Locale settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Locale assumed for exports whose file name has no locale suffix.
    pub default: String,
    /// Locale codes recognised as export file name suffixes.
    pub available: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: "en".to_string(),
            available: vec!["en".to_string(), "ru".to_string()],
        }
    }
}

impl LocaleConfig {
    pub fn is_available(&self, code: &str) -> bool {
        self.available.iter().any(|l| l == code)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel summarizing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`
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
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// `Ok(None)` when the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Post Excerpt Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Excerpts
# ---------------------------------------------------------------------------
[excerpt]
# Maximum summary length in characters. Longer summaries are cut and
# end with "...". Set to 0 to never truncate.
max_length = 200

# Characters of a code block shown in a preview, independent of max_length.
code_snippet_limit = 50

# ---------------------------------------------------------------------------
# Locales
# ---------------------------------------------------------------------------
[locales]
# Export files are named <collection>.<locale>.json (posts.en.json).
# Files without a recognised locale suffix use the default.
default = "en"
available = ["en", "ru"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel summarizing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
