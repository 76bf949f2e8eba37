use crate::domain::collation::Collation;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::reconciliation::OrganizeOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

/// Default auto-organization interval in minutes
pub const DEFAULT_INTERVAL_MINUTES: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleOpts {
    /// Minutes between automatic runs, 0 disables them (default: 5)
    #[serde(default = "default_interval")]
    pub interval_minutes: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}

impl Default for ScheduleOpts {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the bookmark tree JSON file
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Title collation used for sorting and duplicate detection
    #[serde(default)]
    pub collation: Collation,

    /// Policies applied by `organize` and `watch`
    #[serde(default)]
    pub options: OrganizeOptions,

    /// Auto-organization schedule
    #[serde(default)]
    pub schedule: ScheduleOpts,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/bkorg")
}

fn default_store_path() -> String {
    config_dir()
        .join("bookmarks.json")
        .to_str()
        .unwrap_or("bookmarks.json")
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            collation: Collation::default(),
            options: OrganizeOptions::default(),
            schedule: ScheduleOpts::default(),
        }
    }
}

impl Settings {
    /// Store path with `~` and environment variables expanded
    pub fn resolved_store_path(&self) -> PathBuf {
        match shellexpand::full(&self.store_path) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => PathBuf::from(shellexpand::tilde(&self.store_path).as_ref()),
        }
    }
}

// Parse options from a comma separated list like "sort,merge,dedup".
// Listed policies are switched on, all others off.
fn parse_options(opts_str: &str) -> DomainResult<OrganizeOptions> {
    let mut opts = OrganizeOptions {
        sort_bookmarks: false,
        merge_folders: false,
        remove_duplicates: false,
    };

    for part in opts_str.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part {
            "sort" => opts.sort_bookmarks = true,
            "merge" => opts.merge_folders = true,
            "dedup" => opts.remove_duplicates = true,
            other => {
                return Err(DomainError::Other(format!(
                    "Unknown option '{}', expected sort, merge or dedup",
                    other
                )))
            }
        }
    }

    Ok(opts)
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Io(e).context(format!("reading {}", path.display())))?;
    toml::from_str::<Settings>(&text)
        .map_err(|e| DomainError::Other(format!("Invalid config {}: {}", path.display(), e)))
}

// Load settings from config files and environment variables
#[instrument(level = "debug")]
pub fn load_settings(config_path: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_path {
        // An explicitly requested file must exist and parse
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = config_dir().join("config.toml");
            if default_path.exists() {
                trace!("Loading config from: {:?}", default_path);
                read_config_file(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    // Override with environment variables
    if let Ok(store_path) = std::env::var("BKORG_STORE_PATH") {
        trace!("Using BKORG_STORE_PATH from environment: {}", store_path);
        settings.store_path = store_path;
    }

    if let Ok(options) = std::env::var("BKORG_OPTIONS") {
        trace!("Using BKORG_OPTIONS from environment: {}", options);
        settings.options = parse_options(&options)?;
    }

    if let Ok(interval) = std::env::var("BKORG_INTERVAL") {
        trace!("Using BKORG_INTERVAL from environment: {}", interval);
        settings.schedule.interval_minutes = interval.trim().parse().map_err(|e| {
            DomainError::Other(format!("Invalid BKORG_INTERVAL '{}': {}", interval, e))
        })?;
    }

    debug!("Settings loaded: {:?}", settings);
    Ok(settings)
}

pub fn generate_default_config() -> String {
    let default_settings = Settings::default();
    toml::to_string_pretty(&default_settings)
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
