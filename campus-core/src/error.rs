//! Unified error handling system
//!
//! Every failure a view can hit is one of: transport failure, non-success HTTP
//! status, malformed response, or a missing credential. The remaining variants
//! cover local concerns (storage, config, validation, cancellation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type CampusResult<T> = Result<T, CampusError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the Campus client
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    #[error("Malformed response: {message}")]
    MalformedResponse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Missing credential: {message}")]
    MissingCredential {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Operation cancelled: {operation}")]
    Cancelled {
        operation: String,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl CampusError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            CampusError::Network { context, .. } => Some(context),
            CampusError::HttpStatus { context, .. } => Some(context),
            CampusError::MalformedResponse { context, .. } => Some(context),
            CampusError::MissingCredential { context, .. } => Some(context),
            CampusError::Validation { context, .. } => Some(context),
            CampusError::Storage { context, .. } => Some(context),
            CampusError::Config { context, .. } => Some(context),
            CampusError::Cancelled { context, .. } => Some(context),
            CampusError::Timeout { context, .. } => Some(context),
            CampusError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// HTTP status code, for errors produced by a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            CampusError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if error is transient.
    ///
    /// Nothing in the client retries on its own; this only tells the caller
    /// whether asking the user to try again makes sense.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CampusError::Network { .. } => true,
            CampusError::Timeout { .. } => true,
            CampusError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Short text suitable for a transient notification
    pub fn user_message(&self) -> String {
        match self {
            CampusError::MissingCredential { .. } => "Token not found, please log in".to_string(),
            CampusError::HttpStatus { status: 401, .. } => {
                "Session expired, please log in again".to_string()
            }
            CampusError::HttpStatus { message, .. } if !message.is_empty() => message.clone(),
            CampusError::Validation { message, .. } => message.clone(),
            CampusError::MalformedResponse { .. } => "Invalid data received from API".to_string(),
            CampusError::Cancelled { .. } => "Request cancelled".to_string(),
            CampusError::Network { .. } | CampusError::Timeout { .. } => {
                "Could not reach the server".to_string()
            }
            _ => "Something went wrong".to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            CampusError::Internal { .. } | CampusError::Storage { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Internal error occurred"
                );
            }
            CampusError::Config { .. } | CampusError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            CampusError::Network { .. }
            | CampusError::Timeout { .. }
            | CampusError::Cancelled { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Network, timeout or cancellation (may be recoverable)"
                );
            }
            CampusError::MissingCredential { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Request skipped without credential"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::CampusError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'campus config init' to create a default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::CampusError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! missing_credential_error {
    ($operation:expr, $component:expr) => {
        $crate::CampusError::MissingCredential {
            message: format!("no access token available for '{}'", $operation),
            context: $crate::ErrorContext::new($component)
                .with_operation($operation)
                .with_suggestion("Log in with 'campus login' first"),
        }
    };
}

#[macro_export]
macro_rules! malformed_response_error {
    ($msg:expr, $component:expr) => {
        $crate::CampusError::MalformedResponse {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::CampusError::MalformedResponse {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! storage_error {
    ($msg:expr, $component:expr) => {
        $crate::CampusError::Storage {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::CampusError::Storage {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}
