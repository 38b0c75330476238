//! Generator configuration.
//!
//! Handles loading and validating `circlegen.toml`. The file is optional:
//! stock defaults cover the standard repo layout, and a config file only
//! needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! base = "base"             # Image roots, relative to --repo
//! browsers = "browsers"
//! included = "included"
//! output = "circle.yml"     # Generated file, relative to --repo
//!
//! [skip]
//! base = ["8.0.0", "..."]       # Exact tag names that get no job
//! browsers = ["chrome69", "..."]
//!
//! [included]
//! minimum = "6.0.0"         # Oldest included version still rebuilt
//!
//! [unversioned]
//! base = ["12.0.0-libgbm", "manjaro-14.12.0"]
//! browsers = []             # Tags whose name encodes no Node version;
//!                           # their jobs omit the version-check parameter
//! ```
//!
//! Skip lists and the unversioned sets are data, not code: retiring a tag
//! or adding an oddly-named one is a config edit, no rebuild of the tool.
//! Unknown keys are rejected to catch typos early.

use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file under the repository root.
pub const CONFIG_FILE: &str = "circlegen.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `circlegen.toml`.
///
/// All fields have stock defaults. A config file need only specify the
/// values it wants to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Image roots and the output file, relative to the repository root.
    pub paths: PathsConfig,
    /// Exact-match deny lists for the base and browsers categories.
    pub skip: SkipConfig,
    /// Version threshold for the included category.
    pub included: IncludedConfig,
    /// Tags exempt from the Node version check in their CI job.
    pub unversioned: UnversionedConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            skip: SkipConfig::default(),
            included: IncludedConfig::default(),
            unversioned: UnversionedConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("paths.base", &self.paths.base),
            ("paths.browsers", &self.paths.browsers),
            ("paths.included", &self.paths.included),
            ("paths.output", &self.paths.output),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        for (key, list) in [
            ("skip.base", &self.skip.base),
            ("skip.browsers", &self.skip.browsers),
            ("unversioned.base", &self.unversioned.base),
            ("unversioned.browsers", &self.unversioned.browsers),
        ] {
            if list.iter().any(|tag| tag.is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "{key} must not contain empty tag names"
                )));
            }
        }
        Ok(())
    }
}

/// Image roots and the output file, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub base: String,
    pub browsers: String,
    pub included: String,
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base: "base".to_string(),
            browsers: "browsers".to_string(),
            included: "included".to_string(),
            output: "circle.yml".to_string(),
        }
    }
}

/// Exact-match deny lists. A listed tag stays on disk but gets no CI job,
/// which is how already-published images are retired from the build matrix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkipConfig {
    pub base: Vec<String>,
    pub browsers: Vec<String>,
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self {
            base: stock_list(&[
                "6",
                "8",
                "8.0.0",
                "8.2.1",
                "8.9.3",
                "8.15.1",
                "8.16.0",
                "9",
                "centos7",
                "ubuntu16-8",
            ]),
            browsers: stock_list(&[
                "chrome63-ff57",
                "chrome65-ff57",
                "chrome67",
                "chrome67-ff57",
                "chrome69",
                "node8.2.1-chrome73",
                "node8.9.3-chrome75",
                "node11.13.0-chrome73",
            ]),
        }
    }
}

/// Version threshold for the included category. Included images carry plain
/// semver tags; anything older than `minimum` is no longer rebuilt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncludedConfig {
    pub minimum: Version,
}

impl Default for IncludedConfig {
    fn default() -> Self {
        Self {
            minimum: Version::new(6, 0, 0),
        }
    }
}

/// Tags whose directory name does not encode a Node version. Every other
/// base and browsers job passes `checkNodeVersion: true`; jobs for these
/// tags omit the parameter so the image test skips that assertion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnversionedConfig {
    pub base: Vec<String>,
    pub browsers: Vec<String>,
}

impl Default for UnversionedConfig {
    fn default() -> Self {
        Self {
            base: stock_list(&["12.0.0-libgbm", "manjaro-14.12.0"]),
            browsers: Vec::new(),
        }
    }
}

fn stock_list(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load config for a repository root.
///
/// Reads `circlegen.toml` under the root if present; a missing file means
/// stock defaults. The parsed config is validated before use.
pub fn load_config(repo: &Path) -> Result<GeneratorConfig, ConfigError> {
    let path = repo.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GeneratorConfig::default());
    }
    load_config_file(&path)
}

/// Load config from an explicit file path. Unlike [`load_config`], the file
/// must exist: a caller passing `--config` misspelled wants an error, not
/// silent defaults.
pub fn load_config_file(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GeneratorConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `circlegen.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# circlegen configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Repository layout
# ---------------------------------------------------------------------------
[paths]
# Image roots, relative to the repository root (--repo).
base = "base"
browsers = "browsers"
included = "included"

# Generated CI config, relative to the repository root.
output = "circle.yml"

# ---------------------------------------------------------------------------
# Skip lists
# ---------------------------------------------------------------------------
# Exact tag names that keep their directory but get no CI job. This is how
# already-published images are retired from the build matrix.
[skip]
base = [
    "6",
    "8",
    "8.0.0",
    "8.2.1",
    "8.9.3",
    "8.15.1",
    "8.16.0",
    "9",
    "centos7",
    "ubuntu16-8",
]
browsers = [
    "chrome63-ff57",
    "chrome65-ff57",
    "chrome67",
    "chrome67-ff57",
    "chrome69",
    "node8.2.1-chrome73",
    "node8.9.3-chrome75",
    "node11.13.0-chrome73",
]

# ---------------------------------------------------------------------------
# Included images
# ---------------------------------------------------------------------------
# Included images carry plain semantic-version tags and are filtered by
# threshold instead of by list: anything older than `minimum` gets no job.
[included]
minimum = "6.0.0"

# ---------------------------------------------------------------------------
# Unversioned tags
# ---------------------------------------------------------------------------
# Tags whose name does not encode a Node version. Every other base and
# browsers job passes `checkNodeVersion: true`; jobs for these tags omit
# the parameter so the image test skips that assertion.
[unversioned]
base = ["12.0.0-libgbm", "manjaro-14.12.0"]
browsers = []
"##
}
