//! Public address resolution with bounded retry
//!
//! An [`IpSource`] performs a single lookup. The resolver owns the retry policy:
//! a non-success status is retried up to the configured number of attempts with
//! a fixed delay in between, anything else fails on the spot.

use tracing::{debug, warn};

use crate::address::Address;
use crate::config::RetryConfig;
use crate::error::Result;
use crate::traits::IpSource;

/// Resolves the caller's public address once per pass
pub struct AddressResolver {
    source: Box<dyn IpSource>,
    policy: RetryConfig,
}

impl AddressResolver {
    pub fn new(source: Box<dyn IpSource>, policy: RetryConfig) -> Self {
        Self { source, policy }
    }

    /// Endpoint the underlying source queries
    pub fn endpoint(&self) -> &str {
        self.source.endpoint()
    }

    /// Resolve the public address
    ///
    /// # Returns
    ///
    /// - `Ok(Address)`: the trimmed address and its family
    /// - `Err(Error)`: the last error once attempts are exhausted, or the first
    ///   non-retryable error
    pub async fn resolve(&self) -> Result<Address> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.source.fetch().await {
                Ok(address) => {
                    debug!("Resolved {} ({}) on attempt {}", address, address.family(), attempt);
                    return Ok(address);
                }
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!("IP lookup attempt {}/{} failed: {}", attempt, attempts, e);
                    tokio::time::sleep(self.policy.delay()).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        warn!("looks like {} is unavailable", self.source.endpoint());
                    }
                    return Err(e);
                }
            }
        }
    }
}
