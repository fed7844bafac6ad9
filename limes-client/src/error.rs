//! Error types for API clients

use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    UnexpectedStatus {
        /// Request method
        method: String,
        /// Request URL
        url: String,
        /// Response status code
        status: u16,
        /// Response body, trimmed
        body: String,
    },

    /// Authentication could not be attempted or failed
    #[error("authentication failed: {message}")]
    Auth {
        /// Error message
        message: String,
    },

    /// Service catalog has no matching endpoint
    #[error("no {interface} endpoint for service type {service_type:?}{}", in_region(.region))]
    EndpointNotFound {
        /// Service type looked up
        service_type: String,
        /// Interface looked up
        interface: String,
        /// Region looked up
        region: Option<String>,
    },

    /// Invalid client configuration
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Response body could not be decoded
    #[error("cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// I/O error while reading certificates
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested object does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of object
        kind: &'static str,
        /// ID that was requested
        id: String,
    },
}

impl ClientError {
    pub(crate) fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// HTTP status of an [`ClientError::UnexpectedStatus`]
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn in_region(region: &Option<String>) -> String {
    region
        .as_deref()
        .map(|r| format!(" in region {r:?}"))
        .unwrap_or_default()
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
