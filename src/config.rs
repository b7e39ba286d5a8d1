//! Layered run configuration: built-in defaults, TOML file, CLI overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::classify::ProfileKind;
use crate::download::constants::REQUEST_TIMEOUT;
use crate::manifest::ManifestColumns;
use crate::pacing::{DEFAULT_MAX_DELAY_SECS, DEFAULT_MIN_DELAY_SECS, Pacer};
use crate::report::{DEFAULT_REPORT_PREFIX, DEFAULT_REPORT_TITLE};
use crate::run::{LayoutKind, NamingScheme};

/// Upper bound for delay and timeout values, in seconds.
pub const MAX_SECONDS: u64 = 3600;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Default filename suffix for the grouped layout.
pub const DEFAULT_SUFFIX: &str = "Investments";

/// Optional settings; used both for the TOML file and for CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Root directory for downloaded files.
    pub output_dir: Option<PathBuf>,
    /// Classification profile.
    pub profile: Option<ProfileKind>,
    /// Output layout.
    pub layout: Option<LayoutKind>,
    /// Filename suffix for the grouped layout (empty disables it).
    pub suffix: Option<String>,
    pub group_column: Option<String>,
    pub key_column: Option<String>,
    pub url_column: Option<String>,
    /// Lower bound of the inter-download delay in seconds.
    pub min_delay_secs: Option<u64>,
    /// Upper bound of the inter-download delay in seconds.
    pub max_delay_secs: Option<u64>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Directory receiving the run report.
    pub report_dir: Option<PathBuf>,
    /// Report filename prefix.
    pub report_prefix: Option<String>,
    /// First line of the text report.
    pub report_title: Option<String>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        validate_delay_secs("min_delay_secs", self.min_delay_secs)?;
        validate_delay_secs("max_delay_secs", self.max_delay_secs)?;
        if let (Some(min), Some(max)) = (self.min_delay_secs, self.max_delay_secs)
            && min > max
        {
            bail!("Invalid delay range: `min_delay_secs` ({min}) exceeds `max_delay_secs` ({max})");
        }

        if let Some(timeout) = self.timeout_secs
            && !(1..=MAX_SECONDS).contains(&timeout)
        {
            bail!(
                "Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..={MAX_SECONDS}"
            );
        }

        validate_non_empty("group_column", self.group_column.as_deref())?;
        validate_non_empty("key_column", self.key_column.as_deref())?;
        validate_non_empty("url_column", self.url_column.as_deref())?;
        validate_non_empty("report_prefix", self.report_prefix.as_deref())?;

        Ok(())
    }

    /// Fills every unset value from `lower`.
    #[must_use]
    pub fn or(self, lower: &FileConfig) -> FileConfig {
        let lower = lower.clone();
        FileConfig {
            output_dir: self.output_dir.or(lower.output_dir),
            profile: self.profile.or(lower.profile),
            layout: self.layout.or(lower.layout),
            suffix: self.suffix.or(lower.suffix),
            group_column: self.group_column.or(lower.group_column),
            key_column: self.key_column.or(lower.key_column),
            url_column: self.url_column.or(lower.url_column),
            min_delay_secs: self.min_delay_secs.or(lower.min_delay_secs),
            max_delay_secs: self.max_delay_secs.or(lower.max_delay_secs),
            timeout_secs: self.timeout_secs.or(lower.timeout_secs),
            report_dir: self.report_dir.or(lower.report_dir),
            report_prefix: self.report_prefix.or(lower.report_prefix),
            report_title: self.report_title.or(lower.report_title),
        }
    }
}

fn validate_delay_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value > MAX_SECONDS {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 0..={MAX_SECONDS}");
    }
    Ok(())
}

fn validate_non_empty(field: &str, value: Option<&str>) -> Result<()> {
    if value.is_some_and(|v| v.trim().is_empty()) {
        bail!("Invalid config value for `{field}`: must not be empty");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/docfetch/config.toml`
/// 2. `$HOME/.config/docfetch/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("docfetch")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("docfetch")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed, or
/// validated.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path) if path.exists() => Some(load_file_config(path)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

/// Loads and validates a TOML config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has unknown keys or wrong
/// types, or fails validation.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let cfg: FileConfig = toml::from_str(raw)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub profile: ProfileKind,
    pub layout: LayoutKind,
    pub suffix: Option<String>,
    pub columns: ManifestColumns,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    pub timeout: Duration,
    pub report_dir: PathBuf,
    pub report_prefix: String,
    pub report_title: String,
}

impl Settings {
    /// Merges CLI overrides over the file config over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged values are out of range.
    pub fn from_layers(cli: &FileConfig, file: Option<&FileConfig>) -> Result<Self> {
        let merged = match file {
            Some(file) => cli.clone().or(file),
            None => cli.clone(),
        };
        merged.validate()?;

        let min_delay_secs = merged.min_delay_secs.unwrap_or(DEFAULT_MIN_DELAY_SECS);
        let max_delay_secs = merged.max_delay_secs.unwrap_or(DEFAULT_MAX_DELAY_SECS);
        if min_delay_secs > max_delay_secs {
            bail!(
                "Invalid delay range: minimum {min_delay_secs}s exceeds maximum {max_delay_secs}s"
            );
        }

        let defaults = ManifestColumns::default();
        Ok(Self {
            output_dir: merged
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            profile: merged.profile.unwrap_or_default(),
            layout: merged.layout.unwrap_or_default(),
            suffix: Some(merged.suffix.unwrap_or_else(|| DEFAULT_SUFFIX.to_string()))
                .filter(|s| !s.is_empty()),
            columns: ManifestColumns {
                group: merged.group_column.unwrap_or(defaults.group),
                key: merged.key_column.unwrap_or(defaults.key),
                url: merged.url_column.unwrap_or(defaults.url),
            },
            min_delay_secs,
            max_delay_secs,
            timeout: merged
                .timeout_secs
                .map_or(REQUEST_TIMEOUT, Duration::from_secs),
            report_dir: merged.report_dir.unwrap_or_else(|| PathBuf::from(".")),
            report_prefix: merged
                .report_prefix
                .unwrap_or_else(|| DEFAULT_REPORT_PREFIX.to_string()),
            report_title: merged
                .report_title
                .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
        })
    }

    #[must_use]
    pub fn pacer(&self) -> Pacer {
        Pacer::new(self.min_delay_secs, self.max_delay_secs)
    }

    #[must_use]
    pub fn naming(&self) -> NamingScheme {
        NamingScheme::from_layout(self.layout, self.suffix.clone())
    }
}
