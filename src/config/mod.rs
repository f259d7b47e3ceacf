//! Configuration module for nslsl
//!
//! Manages connection settings, display defaults and the field and filter
//! catalogs. Configuration is stored in the user's config directory and can be
//! overridden per value with `NSLSL_*` environment variables.

use crate::filters::FilterCatalog;
use crate::query::FieldSpec;
use crate::session::{DisplayOptions, PageFormat, PageSize};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Public NSLSL site root
pub const DEFAULT_BASE_URL: &str = "https://extapps.ksc.nasa.gov/NSLSL";

const DEFAULT_USER_AGENT: &str = concat!("nslsl/", env!("CARGO_PKG_VERSION"));

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NslslConfig {
    /// Site root without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between harvested pages, and the retry backoff unit
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub page_size: PageSize,

    #[serde(default)]
    pub page_format: PageFormat,

    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    #[serde(default = "default_sort_ascending")]
    pub sort_ascending: bool,

    /// Where `export save` writes files; the working directory when unset
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Fields offered for structured clauses
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,

    /// Named default filter options
    #[serde(default)]
    pub filters: FilterCatalog,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_request_delay_ms() -> u64 {
    300
}

const fn default_max_retries() -> u32 {
    3
}

fn default_sort_by() -> String {
    "PubDate".to_string()
}

const fn default_sort_ascending() -> bool {
    true
}

fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("Title"),
        FieldSpec::text("Author"),
        FieldSpec::text("Abstract"),
        FieldSpec::text("Keywords"),
        FieldSpec::text("Journal"),
        FieldSpec::range("Pub Year"),
    ]
}

impl Default for NslslConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_max_retries(),
            page_size: PageSize::default(),
            page_format: PageFormat::default(),
            sort_by: default_sort_by(),
            sort_ascending: default_sort_ascending(),
            download_dir: None,
            quiet: false,
            fields: default_fields(),
            filters: FilterCatalog::default(),
        }
    }
}

impl NslslConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("nslsl").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if it doesn't exist
    ///
    /// `NSLSL_*` environment variables override file values, e.g.
    /// `NSLSL_PAGE_SIZE=100`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created, or
    /// the filter catalog is invalid.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Environment::with_prefix("NSLSL").try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config
            .filters
            .validate()
            .map_err(|e| ConfigError::Message(format!("Invalid filter catalog: {e}")))?;
        Ok(config)
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// See [`NslslConfig::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = self.to_toml()?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Configuration as TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }

    /// Display options for new sessions
    #[must_use]
    pub fn display(&self) -> DisplayOptions {
        DisplayOptions {
            page_format: self.page_format,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            sort_ascending: self.sort_ascending,
        }
    }

    /// Look up a field by name, ignoring case
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Directory for downloaded exports
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
