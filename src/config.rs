//! Planner configuration and loading.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "STUDY_PLAN_CONFIG";
pub const WEEKLY_HOURS_ENV: &str = "STUDY_PLAN_WEEKLY_HOURS";
pub const HTTP_ADDR_ENV: &str = "STUDY_PLAN_HTTP_ADDR";

pub const DEFAULT_WEEKLY_HOURS: f64 = 40.0;
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Weekly study capacity used when a caller does not pass one.
    pub weekly_hours: f64,
    pub http_addr: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            weekly_hours: DEFAULT_WEEKLY_HOURS,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
        }
    }
}

impl PlannerConfig {
    /// Loads from `path`, else from the file named by `STUDY_PLAN_CONFIG`,
    /// else defaults; environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`PlannerConfig::load`] with an injectable environment lookup.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_path = path
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match file_path {
            Some(file_path) => {
                info!(path = %file_path.display(), "loading planner config");
                Self::load_from_file(&file_path)?
            }
            None => {
                debug!("no planner config file, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_overrides<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(WEEKLY_HOURS_ENV) {
            self.weekly_hours = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: WEEKLY_HOURS_ENV.to_string(),
                    value: raw.clone(),
                })?;
        }
        if let Some(addr) = env(HTTP_ADDR_ENV) {
            self.http_addr = addr;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weekly_hours.is_finite() || self.weekly_hours < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "weeklyHours".to_string(),
                value: self.weekly_hours.to_string(),
            });
        }
        if self.http_addr.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "httpAddr".to_string(),
                value: self.http_addr.clone(),
            });
        }
        Ok(())
    }
}
