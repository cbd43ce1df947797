//! Core data type definitions

use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// Account role, decides which pages and navigation links a user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Faculty,
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Student, Role::Faculty, Role::Guest];

    /// Roles a new account may register with
    pub const SIGNUP: [Role; 3] = [Role::Student, Role::Faculty, Role::Admin];

    /// Wire name, also used to build role-scoped storage keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "guest" => Ok(Role::Guest),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Light/dark UI preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampusConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub attendance: AttendanceConfig,
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend REST API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address every endpoint path is joined onto
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Where cookies and local storage are persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Live attendance poll cadence
    pub poll_interval_ms: u64,
    /// Subject used when marking or polling attendance
    pub subject_id: u32,
}

/// Intermediary service fronting the generative-language provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub enabled: bool,
    /// Absolute URL; when empty, `<api.base_url>/assistant/generate/` is used
    pub endpoint: String,
}
