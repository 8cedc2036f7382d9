//! Site configuration module.
//!
//! Handles loading, validating, and merging `docs-qr.toml`. Stock defaults
//! are overridden by the user's file in the site directory, which is in turn
//! overridden by command-line flags.
//!
//! ## Config File Location
//!
//! ```text
//! my-site/
//! ├── docs-qr.toml             # Optional; every key has a default
//! ├── docs/                    # Content scanned when no host index is given
//! └── static/qr/               # Generated images + _manifest.json
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! url = "http://localhost:3000"  # Public origin of the site
//! base_url = "/"                 # Base path the site is served under
//!
//! [docs]
//! content_dir = "docs"           # Scanned when the host index has no targets
//! route_base_path = "/docs"      # URL prefix of scanned documents
//! on_parse_error = "fail"        # "fail" or "skip" malformed front-matter
//!
//! [output]
//! dir = "static/qr"              # Where images and the manifest are written
//! public_path = "/qr"            # URL path the output directory is served at
//! manifest = "_manifest.json"    # Manifest file name inside `dir`
//!
//! [qr]
//! error_correction = "M"         # L, M, Q or H
//! margin = 1                     # Quiet zone in modules
//! width = 1024                   # Output width in pixels
//!
//! [processing]
//! max_processes = 4              # Max parallel encoders (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ErrorCorrection;
use crate::naming::SiteBase;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the site directory.
pub const CONFIG_FILENAME: &str = "docs-qr.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `docs-qr.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public location of the site.
    pub site: SiteSection,
    /// Where documents come from when scanning the content tree.
    pub docs: DocsConfig,
    /// Output directory layout.
    pub output: OutputConfig,
    /// QR rendering options, applied uniformly to every image of a build.
    pub qr: QrConfig,
    /// Parallel encoding settings.
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Origin such as `https://docs.example.com`.
    pub url: String,
    /// Base path the site is served under, e.g. `/` or `/handbook/`.
    pub base_url: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            url: crate::naming::DEFAULT_ORIGIN.to_string(),
            base_url: "/".to_string(),
        }
    }
}

/// What to do with a document whose front-matter cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Abort the build on the first malformed document.
    #[default]
    Fail,
    /// Record the document as skipped and keep scanning.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Content directory, relative to the site directory.
    pub content_dir: String,
    /// Route prefix prepended to scanned document slugs.
    pub route_base_path: String,
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            content_dir: "docs".to_string(),
            route_base_path: "/docs".to_string(),
            on_parse_error: ParseErrorPolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory, relative to the site directory.
    pub dir: String,
    /// URL path the output directory is published at.
    pub public_path: String,
    /// Manifest file name inside the output directory.
    pub manifest: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "static/qr".to_string(),
            public_path: "/qr".to_string(),
            manifest: "_manifest.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QrConfig {
    pub error_correction: ErrorCorrection,
    /// Quiet zone around the code, in modules.
    pub margin: u32,
    /// Output image width (and height) in pixels.
    pub width: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::Medium,
            margin: 1,
            width: 1024,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel encoders.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Number of encoder threads to run.
///
/// `max_processes` can only lower the count below the machine's cores.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    match config.max_processes {
        Some(limit) => limit.clamp(1, cores),
        None => cores,
    }
}

const MAX_WIDTH: u32 = 8192;
const MAX_MARGIN: u32 = 16;

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qr.width == 0 || self.qr.width > MAX_WIDTH {
            return Err(ConfigError::Validation(format!(
                "qr.width must be 1-{MAX_WIDTH}"
            )));
        }
        if self.qr.margin > MAX_MARGIN {
            return Err(ConfigError::Validation(format!(
                "qr.margin must be 0-{MAX_MARGIN}"
            )));
        }
        let manifest = &self.output.manifest;
        if manifest.contains(['/', '\\']) || !manifest.ends_with(".json") || manifest == ".json" {
            return Err(ConfigError::Validation(
                "output.manifest must be a bare file name ending in .json".into(),
            ));
        }
        if !self.docs.route_base_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "docs.route_base_path must start with '/'".into(),
            ));
        }
        if !self.output.public_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "output.public_path must start with '/'".into(),
            ));
        }
        if !self.site.base_url.starts_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must start with '/'".into(),
            ));
        }
        self.site_base()?;
        Ok(())
    }

    /// The absolute base page URLs resolve against.
    pub fn site_base(&self) -> Result<SiteBase, ConfigError> {
        SiteBase::new(&self.site.url, &self.site.base_url)
            .map_err(|e| ConfigError::Validation(format!("site.url is not a valid URL: {e}")))
    }

    /// Content directory resolved against the site directory.
    pub fn content_dir(&self, site_dir: &Path) -> PathBuf {
        site_dir.join(&self.docs.content_dir)
    }

    /// Output directory resolved against the site directory.
    pub fn output_dir(&self, site_dir: &Path) -> PathBuf {
        site_dir.join(&self.output.dir)
    }

    /// Path of the manifest file resolved against the site directory.
    pub fn manifest_path(&self, site_dir: &Path) -> PathBuf {
        self.output_dir(site_dir).join(&self.output.manifest)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// [`SiteConfig::default`] as a TOML table, the bottom layer of every load.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Layer `overlay` onto `base`.
///
/// Nested tables combine per key; any other overlay value wins outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(layer)) => {
            for (key, value) in layer {
                let combined = match merged.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                merged.insert(key, combined);
            }
            toml::Value::Table(merged)
        }
        (_, value) => value,
    }
}

/// Parse `docs-qr.toml` in `site_dir` without applying defaults.
///
/// A site without the file yields `None`.
pub fn load_raw_config(site_dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let text = match fs::read_to_string(site_dir.join(CONFIG_FILENAME)) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&text)?))
}

/// Fold `layers` over the stock defaults and return the validated result.
pub fn resolve_config(
    layers: impl IntoIterator<Item = toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = layers
        .into_iter()
        .fold(stock_defaults_value()?, merge_toml)
        .try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the site directory: stock defaults, then the file,
/// then `cli_overrides` (a sparse table built from command-line flags).
pub fn load_config(
    site_dir: &Path,
    cli_overrides: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let file = load_raw_config(site_dir)?;
    resolve_config(file.into_iter().chain(cli_overrides))
}

/// Returns a fully-commented stock `docs-qr.toml` with all keys.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-qr Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Public origin of the site. QR codes point at pages under this URL.
url = "http://localhost:3000"

# Base path the site is served under ("/" or e.g. "/handbook/").
base_url = "/"

# ---------------------------------------------------------------------------
# Content scanning (used when the host index yields no flagged pages)
# ---------------------------------------------------------------------------
[docs]
# Directory of .md/.mdx files, relative to the site directory.
content_dir = "docs"

# URL prefix of scanned documents.
route_base_path = "/docs"

# "fail" aborts on malformed front-matter, "skip" reports and continues.
on_parse_error = "fail"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory images and the manifest are written to.
dir = "static/qr"

# URL path the output directory is published at.
public_path = "/qr"

# Manifest file name inside the output directory.
manifest = "_manifest.json"

# ---------------------------------------------------------------------------
# QR rendering (same for every page so codes print consistently)
# ---------------------------------------------------------------------------
[qr]
# Error correction level: "L" (7%), "M" (15%), "Q" (25%), "H" (30%).
error_correction = "M"

# Quiet zone around the code, in modules.
margin = 1

# Output width and height in pixels.
width = 1024

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel encoders.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
