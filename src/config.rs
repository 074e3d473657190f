//! Application configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialised to a TOML table and the user file is merged on top, so a user
//! file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [library]
//! path = "Photos"            # Photo library directory
//! format = "png"             # png | jpeg
//! quality = 90               # JPEG quality (1-100)
//! create_if_missing = true   # Create the directory on first save
//! # access = "denied"        # Force an authorization answer
//!
//! [picker]
//! max_selection = 4          # Film strip pick limit (1-4)
//!
//! [polaroid]
//! preset = "standard"        # standard | soft
//!
//! [processing]
//! max_processes = 4          # Pixel worker threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::acquire::MULTI_PICK_LIMIT;
use crate::imaging::{OutputFormat, PolaroidPreset, Quality};
use crate::library::{AuthorizationStatus, DirectoryLibraryOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where and how saved photos are written.
    pub library: LibraryConfig,
    /// Photo picker limits.
    pub picker: PickerConfig,
    /// Polaroid screen settings.
    pub polaroid: PolaroidConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.library.quality) {
            return Err(ConfigError::Validation(
                "library.quality must be 1-100".into(),
            ));
        }
        if self.library.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "library.path must not be empty".into(),
            ));
        }
        if !(1..=MULTI_PICK_LIMIT).contains(&self.picker.max_selection) {
            return Err(ConfigError::Validation(format!(
                "picker.max_selection must be 1-{MULTI_PICK_LIMIT}"
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Photo library settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Library directory, relative to the working directory.
    pub path: String,
    pub format: OutputFormat,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    pub create_if_missing: bool,
    /// Fixed authorization answer. When absent the directory is probed.
    pub access: Option<AuthorizationStatus>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: "Photos".to_string(),
            format: OutputFormat::Png,
            quality: 90,
            create_if_missing: true,
            access: None,
        }
    }
}

impl LibraryConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    pub fn options(&self) -> DirectoryLibraryOptions {
        DirectoryLibraryOptions {
            format: self.format,
            quality: Quality::new(self.quality),
            create_if_missing: self.create_if_missing,
            access: self.access,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// How many photos the film strip screen accepts per pick.
    pub max_selection: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_selection: MULTI_PICK_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolaroidConfig {
    /// Preset used when none is given on the command line.
    pub preset: PolaroidPreset,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of pixel worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
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
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# framed configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# framed reads config.toml from the directory given by --config
# (default: the current directory). Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Photo library
# ---------------------------------------------------------------------------
[library]
# Directory saved photos are written to. Each photo is named by a hash of
# its encoded bytes, so saving the same photo twice keeps one copy.
path = "Photos"

# Encoding for saved photos: "png" (lossless) or "jpeg".
format = "png"

# JPEG quality (1 = worst, 100 = best). Ignored for PNG.
quality = 90

# Create the library directory on the first save. When false, a missing
# directory means access has not been granted yet.
create_if_missing = true

# Answer authorization requests with a fixed status instead of probing the
# directory: "authorized", "limited", "denied", "restricted" or
# "not-determined".
# access = "denied"

# ---------------------------------------------------------------------------
# Photo picker
# ---------------------------------------------------------------------------
[picker]
# Photos accepted per film strip pick (1-4). Extra photos are dropped.
max_selection = 4

# ---------------------------------------------------------------------------
# Polaroid screen
# ---------------------------------------------------------------------------
[polaroid]
# "standard": warm white balance, bright, vignette, instant-film tint.
# "soft": lower contrast and a stronger blur.
preset = "standard"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum pixel worker threads.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
