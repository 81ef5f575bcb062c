//! Application configuration. Scan paths, filter, folder policy, limits.
//!
//! Loaded from environment / .env with the VK_GRAB_ prefix, then validated
//! into typed [`Settings`]. All ConfigError checks happen here, before any
//! I/O starts.

use crate::domain::{DomainError, FolderPolicy, GrabFilter};
use serde::Deserialize;

/// Default simultaneous downloads.
pub const DEFAULT_DOWNLOAD_LIMIT: usize = 50;

/// Valid download limit range (exclusive upper bound).
pub const DOWNLOAD_LIMIT_MAX: usize = 500;

/// Raw configuration as read from the environment.
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Comma-separated scan directories. Read from VK_GRAB_PATHS. Default ".".
    #[serde(default)]
    pub paths: Option<String>,

    /// Simultaneous download cap, 1..500. Read from VK_GRAB_LIMIT. Default 50.
    #[serde(default)]
    pub limit: Option<usize>,

    /// Grabbing filter: all | owner | opponent | pair | all_except_pair.
    /// Read from VK_GRAB_FILTER. Default "all".
    #[serde(default)]
    pub filter: Option<String>,

    /// Dialog folder mode: document | flat | custom. Read from
    /// VK_GRAB_FOLDER_MODE. Default "document".
    #[serde(default)]
    pub folder_mode: Option<String>,

    /// Folder name for the custom mode. Read from VK_GRAB_FOLDER_NAME.
    #[serde(default)]
    pub folder_name: Option<String>,

    /// Look up owner display names for folder labels. Read from
    /// VK_GRAB_RESOLVE_NAMES. Default false.
    #[serde(default)]
    pub resolve_names: Option<bool>,
}

/// Validated, typed settings the pipeline runs with.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: Vec<String>,
    pub download_limit: usize,
    pub filter: GrabFilter,
    pub folder_policy: FolderPolicy,
    pub resolve_names: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        // try_parsing so VK_GRAB_LIMIT=50 / VK_GRAB_RESOLVE_NAMES=true
        // deserialize into the numeric/bool fields
        let c = config::Config::builder()
            .add_source(config::Environment::with_prefix("VK_GRAB").try_parsing(true))
            .build()?;
        c.try_deserialize()
    }

    /// Validate and convert. Every rejection here is fatal to the run.
    pub fn validate(&self) -> Result<Settings, DomainError> {
        let paths: Vec<String> = self
            .paths
            .as_deref()
            .unwrap_or(".")
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if paths.is_empty() {
            return Err(DomainError::Config("no scan paths given".into()));
        }

        let download_limit = self.limit.unwrap_or(DEFAULT_DOWNLOAD_LIMIT);
        if download_limit == 0 || download_limit >= DOWNLOAD_LIMIT_MAX {
            return Err(DomainError::Config(format!(
                "incorrect download limit {} (possible value in [1, {}))",
                download_limit, DOWNLOAD_LIMIT_MAX
            )));
        }

        let filter: GrabFilter = self.filter.as_deref().unwrap_or("all").parse()?;

        let folder_policy = match self.folder_mode.as_deref().unwrap_or("document") {
            "document" => FolderPolicy::PerDocument,
            "flat" => FolderPolicy::Flat,
            "custom" => match self.folder_name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => FolderPolicy::Custom(name.to_string()),
                _ => {
                    return Err(DomainError::Config(
                        "folder_mode=custom requires a non-empty folder_name".into(),
                    ));
                }
            },
            other => {
                return Err(DomainError::Config(format!(
                    "unknown folder_mode '{}' (expected document | flat | custom)",
                    other
                )));
            }
        };

        Ok(Settings {
            paths,
            download_limit,
            filter,
            folder_policy,
            resolve_names: self.resolve_names.unwrap_or(false),
        })
    }
}
