//! Configuration management

use crate::error::{CampusError, CampusResult};
use crate::types::{ApiConfig, AssistantConfig, AttendanceConfig, CampusConfig, StorageConfig};

use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding `api.base_url`
pub const BASE_URL_ENV: &str = "CAMPUS_API_BASE_URL";

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000/api".to_string(),
                timeout_seconds: 30,
                user_agent: format!("campus/{}", env!("CARGO_PKG_VERSION")),
            },
            storage: StorageConfig {
                data_dir: "~/.campus/data".to_string(),
            },
            attendance: AttendanceConfig {
                poll_interval_ms: 5000,
                subject_id: 1,
            },
            assistant: AssistantConfig {
                enabled: true,
                endpoint: String::new(),
            },
            logging: Default::default(),
        }
    }
}

impl CampusConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CampusResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CampusError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: CampusConfig = toml::from_str(&content).map_err(|e| CampusError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> CampusResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| CampusError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content).map_err(|e| CampusError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Candidate config locations, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|d| d.join("campus").join("config.toml")),
            dirs::home_dir().map(|d| d.join(".campus").join("config.toml")),
            Some(PathBuf::from("campus.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from an explicit path, else the first existing default location,
    /// else defaults. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> CampusResult<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Self::from_file(path)?
            }
            None => match Self::default_paths().into_iter().find(|p| p.exists()) {
                Some(path) => {
                    info!("Loading configuration from {:?}", path);
                    Self::from_file(path)?
                }
                None => {
                    info!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.api.base_url = base_url;
            }
        }
    }

    /// Data directory with a leading `~` expanded
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.storage.data_dir)
    }

    /// Resolved assistant endpoint
    pub fn assistant_endpoint(&self) -> String {
        if self.assistant.endpoint.trim().is_empty() {
            format!("{}/assistant/generate/", self.api.base_url.trim_end_matches('/'))
        } else {
            self.assistant.endpoint.clone()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CampusResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CampusError::Config {
                message: "api.base_url must not be empty".to_string(),
                source: None,
                context: crate::ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.base_url, e.g. http://127.0.0.1:8000/api"),
            });
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(CampusError::Config {
                message: format!("api.base_url is not an http(s) URL: {}", self.api.base_url),
                source: None,
                context: crate::ErrorContext::new("config").with_operation("validate"),
            });
        }

        if self.api.timeout_seconds == 0 {
            return Err(CampusError::Config {
                message: "api.timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: crate::ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.timeout_seconds to a positive value"),
            });
        }

        if self.attendance.poll_interval_ms == 0 {
            return Err(CampusError::Config {
                message: "attendance.poll_interval_ms must be greater than 0".to_string(),
                source: None,
                context: crate::ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set attendance.poll_interval_ms to a positive value"),
            });
        }

        if self.storage.data_dir.trim().is_empty() {
            return Err(CampusError::Config {
                message: "storage.data_dir must not be empty".to_string(),
                source: None,
                context: crate::ErrorContext::new("config").with_operation("validate"),
            });
        }

        Ok(())
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}
