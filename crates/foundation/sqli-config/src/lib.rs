//! Lab configuration
//!
//! Loading order: built-in defaults, then an optional YAML file, then
//! `SQLI_LAB_*` environment variables. CLI flags are applied last by the
//! binary.
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 3000
//! database_path: demo.db
//! log_capacity: 100
//! monitor_refresh_secs: 5
//! seed_on_start: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub const ENV_HOST: &str = "SQLI_LAB_HOST";
pub const ENV_PORT: &str = "SQLI_LAB_PORT";
pub const ENV_DB: &str = "SQLI_LAB_DB";
pub const ENV_LOG_CAPACITY: &str = "SQLI_LAB_LOG_CAPACITY";
pub const ENV_REFRESH_SECS: &str = "SQLI_LAB_REFRESH_SECS";
pub const ENV_SEED: &str = "SQLI_LAB_SEED";

/// Server and lab settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port
    pub port: u16,
    /// SQLite file holding the demo users
    pub database_path: PathBuf,
    /// Attempts kept in the event log
    pub log_capacity: usize,
    /// Dashboard auto-refresh interval
    pub monitor_refresh_secs: u64,
    /// Create and seed the users table when it is missing
    pub seed_on_start: bool,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: PathBuf::from("demo.db"),
            log_capacity: 100,
            monitor_refresh_secs: 5,
            seed_on_start: true,
        }
    }
}

impl LabConfig {
    /// Defaults, then the file (explicit path, or the user config file if it
    /// exists), then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.config/sqli-lab/config.yaml` (platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sqli-lab").join("config.yaml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = parse(ENV_PORT, port)?;
        }
        if let Some(db) = lookup(ENV_DB) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(capacity) = lookup(ENV_LOG_CAPACITY) {
            self.log_capacity = parse(ENV_LOG_CAPACITY, capacity)?;
        }
        if let Some(secs) = lookup(ENV_REFRESH_SECS) {
            self.monitor_refresh_secs = parse(ENV_REFRESH_SECS, secs)?;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed_on_start = seed != "false" && seed != "0";
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue { key: "port", value: "0".into() });
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::InvalidValue { key: "log_capacity", value: "0".into() });
        }
        if self.monitor_refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "monitor_refresh_secs",
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
