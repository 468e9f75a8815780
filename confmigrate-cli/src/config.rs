//! Configuration file loading for confmigrate.
//!
//! Discovers and loads `confmigrate.toml` from the directory holding the
//! current config file. Merges file settings with CLI arguments (CLI takes
//! precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use confmigrate_core::MigrateSettings;
use confmigrate_core::settings::DEFAULT_TIMESTAMP_FORMAT;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "confmigrate.toml";

/// Top-level configuration from confmigrate.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfmigrateConfig {
    pub migrate: MigrateConfig,

    /// Backup settings.
    pub backups: BackupsConfig,
}

/// Migrate section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// chrono format string for the banner timestamp.
    pub timestamp_format: String,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Backups section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to copy the original file aside before writing.
    pub enabled: bool,

    /// Suffix appended to the original file name.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: ".confmigrate.bak".to_string(),
        }
    }
}

impl BackupsConfig {
    pub fn backup_path(&self, file: &Utf8Path) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{}", file, self.suffix))
    }
}

/// Look for `confmigrate.toml` in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a confmigrate.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<ConfmigrateConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<ConfmigrateConfig> {
    let config: ConfmigrateConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config path if given, else whatever sits next to
/// `current_file`, else defaults.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    current_file: &Utf8Path,
) -> anyhow::Result<ConfmigrateConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let dir = current_file.parent().unwrap_or(Utf8Path::new("."));
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(ConfmigrateConfig::default()),
    }
}

/// Config file and CLI arguments combined.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub settings: MigrateSettings,
    pub backups: BackupsConfig,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: ConfmigrateConfig,
}

impl ConfigMerger {
    pub fn new(config: ConfmigrateConfig) -> Self {
        Self { config }
    }

    /// `--no-backup` wins over `backups.enabled`; `--timestamp-format` wins over
    /// `migrate.timestamp_format`.
    pub fn merge_migrate_args(
        self,
        no_backup: bool,
        cli_timestamp_format: Option<&str>,
    ) -> MergedConfig {
        let timestamp_format = cli_timestamp_format
            .map(str::to_string)
            .unwrap_or(self.config.migrate.timestamp_format);

        let mut backups = self.config.backups;
        if no_backup {
            backups.enabled = false;
        }

        MergedConfig {
            settings: MigrateSettings { timestamp_format },
            backups,
        }
    }
}
