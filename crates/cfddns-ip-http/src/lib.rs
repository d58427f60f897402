// # HTTP IP Source
//
// Discovers the caller's public address by asking an echo endpoint
// (e.g. https://api.ipify.org) which answers with the address as plain text.
//
// ## Behavior
//
// - One GET per `fetch()`; retrying belongs to `cfddns_core::AddressResolver`
// - Non-success status → `Error::IpStatus` (retryable)
// - Connection/read failure → `Error::IpTransport`
// - Empty body → `Error::EmptyAddress`
// - The family is derived from the body text, no address validation

use cfddns_core::traits::IpSource;
use cfddns_core::{Address, Error, Result};

use std::time::Duration;

/// Default HTTP timeout for echo requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP echo-endpoint IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://api.ipify.org")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn fetch(&self) -> Result<Address> {
        tracing::debug!("Fetching public address from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::IpTransport {
                endpoint: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::IpStatus {
                endpoint: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| Error::IpTransport {
            endpoint: self.url.clone(),
            message: format!("Failed to read response: {}", e),
        })?;

        Address::parse(&body).ok_or_else(|| Error::EmptyAddress(self.url.clone()))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
