use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::{deserialize_interval, serialize_interval};

/// Default time between background scans (15 minutes).
fn default_scan_interval() -> Duration {
    Duration::from_secs(15 * 60)
}

fn default_scan_keywords() -> Vec<String> {
    ["refund", "return", "reimbursement", "money back"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Background scan settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Run scans periodically from the `daemon` command.
    pub auto_scan_enabled: bool,

    /// Time between background scans.
    #[serde(
        default = "default_scan_interval",
        deserialize_with = "deserialize_interval",
        serialize_with = "serialize_interval"
    )]
    pub interval: Duration,

    pub sms_enabled: bool,

    pub email_enabled: bool,

    /// Save background results as records instead of only notifying.
    pub auto_import_enabled: bool,

    /// Keywords shown to users as what scans look for.
    ///
    /// Not consulted by extraction, which has fixed tables.
    #[serde(default = "default_scan_keywords")]
    pub keywords: Vec<String>,

    /// JSON export of the phone's SMS inbox. If relative, resolved from the
    /// config file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_export: Option<PathBuf>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            auto_scan_enabled: false,
            interval: default_scan_interval(),
            sms_enabled: false,
            email_enabled: false,
            auto_import_enabled: false,
            keywords: default_scan_keywords(),
            sms_export: None,
        }
    }
}

impl ScanSettings {
    pub fn channel_enabled(&self, channel: crate::models::Channel) -> bool {
        match channel {
            crate::models::Channel::Sms => self.sms_enabled,
            crate::models::Channel::Email => self.email_enabled,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file location.
    /// If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    pub scan: ScanSettings,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn resolve_path(config_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        }
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to `config_dir`.
    /// If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) => Self::resolve_path(config_dir, data_dir),
            None => config_dir.to_path_buf(),
        }
    }

    /// Scan settings with `sms_export` resolved against `config_dir`.
    pub fn resolve_scan(&self, config_dir: &Path) -> ScanSettings {
        let mut scan = self.scan.clone();
        scan.sms_export = scan
            .sms_export
            .as_deref()
            .map(|path| Self::resolve_path(config_dir, path));
        scan
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config_path: PathBuf,

    /// The resolved data directory path.
    pub data_dir: PathBuf,

    pub scan: ScanSettings,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./refundbook.toml` if it exists in current directory
/// 2. `~/.local/share/refundbook/refundbook.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("refundbook.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("refundbook").join("refundbook.toml");
    }

    local_config
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("Failed to resolve path: {}", path.display()));
    }
    if path.is_relative() {
        Ok(std::env::current_dir()
            .context("Failed to get current directory")?
            .join(path))
    } else {
        Ok(path.to_path_buf())
    }
}

impl ResolvedConfig {
    /// Load and resolve config, falling back to defaults when the file is missing.
    ///
    /// Paths are resolved relative to the config file's parent directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        let config_path = absolute(config_path)?;
        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;

        let config = Config::load_or_default(&config_path)?;
        Ok(Self {
            data_dir: config.resolve_data_dir(config_dir),
            scan: config.resolve_scan(config_dir),
            config_path: config_path.clone(),
        })
    }

    /// Directory holding `<account-id>.json` mail exports.
    pub fn mail_export_dir(&self) -> PathBuf {
        self.data_dir.join("mail")
    }
}

/// Where the background scanner reads its settings from on every cycle.
pub trait SettingsSource: Send + Sync {
    fn scan_settings(&self) -> Result<ScanSettings>;
}

/// Settings held in memory, replaceable at runtime.
#[derive(Debug, Default)]
pub struct StaticSettings {
    settings: Mutex<ScanSettings>,
}

impl StaticSettings {
    pub fn new(settings: ScanSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    pub fn set(&self, settings: ScanSettings) {
        let mut current = self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = settings;
    }
}

impl SettingsSource for StaticSettings {
    fn scan_settings(&self) -> Result<ScanSettings> {
        let settings = self
            .settings
            .lock()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        Ok(settings.clone())
    }
}

/// Re-reads the config file on each call so edits apply to the next cycle.
#[derive(Debug, Clone)]
pub struct ConfigFileSettings {
    path: PathBuf,
}

impl ConfigFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSource for ConfigFileSettings {
    fn scan_settings(&self) -> Result<ScanSettings> {
        Ok(ResolvedConfig::load_or_default(&self.path)?.scan)
    }
}
