//! Error types for cfddns
//!
//! Every failure reason the updater distinguishes has its own variant, so the
//! pass driver can log it precisely and decide whether to retry, skip the
//! hostname, or abort the run.

use thiserror::Error;

/// Result type alias for cfddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cfddns
#[derive(Error, Debug)]
pub enum Error {
    /// The IP echo endpoint answered with a non-success status
    #[error("{endpoint} answered with status {status}")]
    IpStatus {
        /// Endpoint URL
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// The IP echo endpoint could not be reached
    #[error("{endpoint} failed: {message}")]
    IpTransport {
        /// Endpoint URL
        endpoint: String,
        /// Transport error message
        message: String,
    },

    /// The IP echo endpoint answered with an empty body
    #[error("{0} failed: empty response")]
    EmptyAddress(String),

    /// No zone matched the derived zone name
    #[error("{0} - zone not found")]
    ZoneNotFound(String),

    /// More than one zone matched the derived zone name
    #[error("{zone} - api call returned {count} items")]
    AmbiguousZone {
        /// Zone name that was queried
        zone: String,
        /// Number of zones returned
        count: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication errors (missing or rejected credential)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether another attempt may succeed.
    ///
    /// Only a non-success status from the IP echo endpoint is retried. Transport
    /// failures, empty bodies and every provider error fail on the first attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::IpStatus { .. })
    }
}
