//! Error types for the Escriba application.

use thiserror::Error;

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => "network".to_string(),
    }
}

/// A shared error type for the entire Escriba application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum EscribaError {
    /// Input validation error (rejected before any collaborator call)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication/session error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote collaborator failure (network or error payload)
    #[error("Remote error ({}): {message}", status_label(.status))]
    Remote {
        status: Option<u16>,
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EscribaError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Remote error without an HTTP status
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Remote error carrying the HTTP status code
    pub fn remote_with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this error came from a remote collaborator
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

impl From<std::io::Error> for EscribaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for EscribaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for EscribaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for EscribaError {
    fn from(err: reqwest::Error) -> Self {
        Self::Remote {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, used at binary boundaries)
impl From<anyhow::Error> for EscribaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, EscribaError>`.
pub type Result<T> = std::result::Result<T, EscribaError>;
