//! Configuration types for cfddns
//!
//! The configuration is a small YAML document:
//!
//! ```yaml
//! token: <cloudflare api token>      # required
//! endpoint: https://api.ipify.org    # optional
//! interval: 600                      # optional, seconds
//! notification:                      # optional
//!   enabled: true
//!   from: cfddns@example.com
//!   to: admin@example.com
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default IP echo endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.ipify.org";

/// Default interval between passes (in seconds)
pub const DEFAULT_INTERVAL_SECS: u64 = 600;

/// Main cfddns configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cloudflare API token
    pub token: String,

    /// IP echo endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Interval between passes (in seconds)
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Pass summary notification
    #[serde(default)]
    pub notification: Option<NotificationConfig>,

    /// Retry policy for IP resolution
    #[serde(default)]
    pub retry: RetryConfig,
}

// The token never leaves through Debug
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("interval", &self.interval)
            .field("notification", &self.notification)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: default_endpoint(),
            interval: default_interval(),
            notification: None,
            retry: RetryConfig::default(),
        }
    }

    /// Parse a YAML document and validate it
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::config("token is required"));
        }

        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(Error::config(format!(
                "endpoint must use HTTP or HTTPS scheme. Got: {}",
                self.endpoint
            )));
        }

        if self.interval == 0 {
            return Err(Error::config("interval must be > 0"));
        }

        if self.retry.attempts == 0 {
            return Err(Error::config("retry.attempts must be > 0"));
        }

        if let Some(notification) = &self.notification {
            notification.validate()?;
        }

        Ok(())
    }

    /// Interval between passes
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Notification settings, if notification is enabled
    pub fn enabled_notification(&self) -> Option<&NotificationConfig> {
        self.notification.as_ref().filter(|n| n.enabled)
    }
}

/// Pass summary notification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether a summary is sent
    #[serde(default)]
    pub enabled: bool,

    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Recipient address
    #[serde(default)]
    pub to: String,
}

impl NotificationConfig {
    /// Validate the notification settings
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.from.trim().is_empty() {
            return Err(Error::config("notification.from is required when enabled"));
        }
        if self.to.trim().is_empty() {
            return Err(Error::config("notification.to is required when enabled"));
        }
        Ok(())
    }
}

/// Retry policy for IP resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts against the echo endpoint
    #[serde(default = "default_attempts")]
    pub attempts: usize,

    /// Delay between attempts (in seconds)
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl RetryConfig {
    /// Delay between attempts
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_secs: default_delay_secs(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_attempts() -> usize {
    3
}

fn default_delay_secs() -> u64 {
    5
}
