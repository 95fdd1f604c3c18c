//! Archive configuration management for `archive.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[store]`   | Content store project, dataset, API, credentials |
//! | `[archive]` | Category chip priority, summary length           |
//! | `[serve]`   | HTTP server (interface, port)                    |
//!
//! # Example
//!
//! ```toml
//! [store]
//! project_id = "k2tkuvlp"
//! dataset = "production"
//!
//! [archive]
//! priority = ["プロダクト紹介", "活動報告"]
//!
//! [serve]
//! port = 5277
//! ```

mod archive;
pub mod defaults;
mod error;
mod serve;
mod store;

pub use archive::ArchiveConfig;
pub use error::ConfigError;
pub use serve::ServeConfig;
pub use store::StoreConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing archive.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Content store connection
    #[serde(default)]
    pub store: StoreConfig,

    /// Archive presentation settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Locate, parse, override and validate the config for this invocation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        if !config_path.exists() {
            bail!("Config file not found: {}", config_path.display());
        }

        let mut config = Self::from_path(&config_path)?;
        config.config_path = Self::normalize_path(&config_path);
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        let store = &self.store;

        if store.project_id.is_empty() {
            bail!(ConfigError::Validation("[store.project_id] is required".into()));
        }
        if !store
            .project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            bail!(ConfigError::Validation(
                "[store.project_id] may only contain a-z, 0-9 and dashes".into()
            ));
        }

        if !Self::is_valid_dataset(&store.dataset) {
            bail!(ConfigError::Validation(
                "[store.dataset] must be 1-64 lowercase letters, digits, `_` or `-`".into()
            ));
        }

        if !Self::is_valid_api_version(&store.api_version) {
            bail!(ConfigError::Validation(
                "[store.api_version] must be `1`, `X` or a date like `2023-05-03`".into()
            ));
        }

        if store.timeout_secs == 0 {
            bail!(ConfigError::Validation(
                "[store.timeout_secs] must be greater than 0".into()
            ));
        }

        if self.archive.summary_chars == 0 {
            bail!(ConfigError::Validation(
                "[archive.summary_chars] must be greater than 0".into()
            ));
        }

        if self.serve.interface.parse::<IpAddr>().is_err() {
            bail!(ConfigError::Validation(format!(
                "[serve.interface] `{}` is not an IP address",
                self.serve.interface
            )));
        }

        Ok(())
    }

    fn is_valid_dataset(dataset: &str) -> bool {
        !dataset.is_empty()
            && dataset.len() <= 64
            && dataset
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    }

    fn is_valid_api_version(version: &str) -> bool {
        matches!(version, "1" | "X") || NaiveDate::parse_from_str(version, "%Y-%m-%d").is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
