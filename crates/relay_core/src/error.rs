use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid settings file: {0}")]
    InvalidSettings(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Classification of errors for logging and user display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Error caused by user action (bad input, malformed import, cancel).
    UserError,
    /// Model catalog or routing precondition violated.
    RoutingError,
    /// Internal system error (file I/O, etc.).
    SystemError,
    /// Invalid or missing configuration.
    ConfigError,
}

impl ErrorCategory {
    /// Level a failed command of this category is logged at. User mistakes
    /// are routine and stay at debug.
    pub fn log_level(self) -> tracing::Level {
        match self {
            Self::UserError => tracing::Level::DEBUG,
            Self::RoutingError => tracing::Level::WARN,
            Self::SystemError | Self::ConfigError => tracing::Level::ERROR,
        }
    }
}

impl RelayError {
    /// Returns the broad error category for routing and display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::ConfigError,
            Self::InvalidSettings(_) => ErrorCategory::UserError,
            Self::Routing(_) => ErrorCategory::RoutingError,
            Self::Cancelled => ErrorCategory::UserError,
            Self::InvalidInput(_) => ErrorCategory::UserError,
            Self::Io(_) => ErrorCategory::SystemError,
            Self::Internal(_) => ErrorCategory::SystemError,
        }
    }

    /// Returns a user-friendly message (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(msg) => format!("Configuration issue: {msg}"),
            Self::InvalidSettings(msg) => {
                format!("Could not import settings: {msg}. Current settings were kept.")
            }
            Self::Routing(msg) => format!("Routing failed: {msg}"),
            Self::Cancelled => "Run cancelled.".into(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Io(_) => "File error. Check the path and permissions.".into(),
            Self::Internal(_) => "An unexpected error occurred.".into(),
        }
    }

    /// Whether the session can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}
