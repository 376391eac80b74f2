use crate::error::{OrgmapError, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_RESOURCE: &str = "https://graph.microsoft.com";

/// Largest `$top` the users endpoint accepts
const MAX_PAGE_SIZE: u32 = 999;

const ENV_GRAPH_BASE_URL: &str = "ORGMAP_GRAPH_BASE_URL";
const ENV_AUTHORITY_HOST: &str = "ORGMAP_AUTHORITY_HOST";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Graph endpoint including the API version segment
    pub graph_base_url: String,

    /// Identity provider host used for the client credentials exchange
    pub authority_host: String,

    /// Resource whose `/.default` scope is requested
    pub graph_resource: String,

    /// Page size requested through `$top`; server default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Optional OData `$filter`, e.g. `userType eq 'Member'` to leave out guests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Per-request timeout; reqwest default (none) when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    pub office_layout: OfficeLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            graph_resource: DEFAULT_GRAPH_RESOURCE.to_string(),
            page_size: None,
            filter: None,
            timeout_secs: None,
            office_layout: OfficeLayout::default(),
        }
    }
}

/// Shape of the office locations report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OfficeLayout {
    /// Country, then city, then office location
    #[default]
    Nested,
    /// One level keyed by office location
    Flat,
}

impl Config {
    /// Apply environment overrides through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_GRAPH_BASE_URL).filter(|v| !v.is_empty()) {
            self.graph_base_url = url;
        }
        if let Some(host) = lookup(ENV_AUTHORITY_HOST).filter(|v| !v.is_empty()) {
            self.authority_host = host;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.page_size {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(OrgmapError::ConfigError(format!(
                    "page_size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, size
                )));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(OrgmapError::ConfigError(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        for (key, value) in [
            ("graph_base_url", &self.graph_base_url),
            ("authority_host", &self.authority_host),
            ("graph_resource", &self.graph_resource),
        ] {
            if !value.starts_with("https://") && !value.starts_with("http://") {
                return Err(OrgmapError::ConfigError(format!(
                    "{} must be an http(s) URL, got '{}'",
                    key, value
                )));
            }
        }

        Ok(())
    }
}

/// Configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_file: PathBuf,
}

impl ConfigManager {
    /// Use `config.toml` in the platform config directory
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("com", "orgmap", "orgmap").ok_or_else(|| {
            OrgmapError::ConfigError("Failed to determine config directory".into())
        })?;

        Ok(Self {
            config_file: project_dirs.config_dir().join("config.toml"),
        })
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: path.into(),
        }
    }

    /// Load config; a missing file yields the defaults
    pub fn load_config(&self) -> Result<Config> {
        let config = if self.config_file.exists() {
            let contents = fs::read_to_string(&self.config_file)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("No config file at {:?}, using defaults", self.config_file);
            Config::default()
        };

        let config = config.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }
}
