// # Cloudflare DNS Provider
//
// Cloudflare API v4 implementation of `cfddns_core::DnsProvider`.
//
// ## Behavior
//
// - One HTTP request per trait call, errors propagated as-is
// - No retry, no caching, no background tasks
// - API token sent as a bearer credential and never logged
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...&match=all`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`
//   (fields not sent, such as `proxied`, `ttl` and `comment`, keep their values)

use async_trait::async_trait;
use cfddns_core::traits::{DnsProvider, DnsRecord, Zone};
use cfddns_core::{Address, Error, RecordFamily, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "cloudflare";

/// Envelope wrapping every Cloudflare v4 response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    message: String,
}

impl ApiMessage {
    fn join(messages: &[ApiMessage]) -> String {
        messages
            .iter()
            .map(|m| format!("{} ({})", m.message, m.code))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Deserialize)]
struct ZoneResult {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RecordResult {
    id: String,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    content: String,
}

impl From<RecordResult> for DnsRecord {
    fn from(record: RecordResult) -> Self {
        DnsRecord {
            id: record.id,
            name: record.name,
            record_type: record.record_type,
            content: record.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct RecordPayload<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
    content: &'a str,
}

impl<'a> RecordPayload<'a> {
    fn new(name: &'a str, address: &'a Address) -> Self {
        Self {
            name,
            record_type: address.family().as_str(),
            content: address.as_str(),
        }
    }
}

/// Cloudflare DNS provider
///
/// # Security
///
/// The Debug implementation does not expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider talking to the public Cloudflare API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is empty.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a provider talking to `base_url` instead of the public API
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token is required"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    /// Send an authenticated request and unwrap the v4 envelope
    ///
    /// `call` names the API call in error messages (e.g. "/zones.get").
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder, call: &str) -> Result<T> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("{} - HTTP request failed: {}", call, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(call, status.as_u16(), &body));
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("{} - Failed to parse response: {}", call, e)))?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER,
                format!("{} - api call failed: {}", call, ApiMessage::join(&envelope.errors)),
            ));
        }

        envelope
            .result
            .ok_or_else(|| Error::provider(PROVIDER, format!("{} - response has no result", call)))
    }
}

/// Map a non-success status to an error
fn status_error(call: &str, status: u16, body: &str) -> Error {
    // Cloudflare puts the useful part in the envelope's errors
    let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .filter(|envelope| !envelope.errors.is_empty())
        .map(|envelope| ApiMessage::join(&envelope.errors))
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => Error::auth(format!(
            "{} - invalid API token or insufficient permissions. Status: {} - {}",
            call, status, detail
        )),
        429 => Error::provider(
            PROVIDER,
            format!("{} - rate limit exceeded. Status: {}", call, status),
        ),
        500..=599 => Error::provider(
            PROVIDER,
            format!("{} - Cloudflare server error: {} - {}", call, status, detail),
        ),
        _ => Error::provider(PROVIDER, format!("{} - api call failed: {} - {}", call, status, detail)),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn find_zones(&self, name: &str) -> Result<Vec<Zone>> {
        tracing::debug!("GET /zones?name={}", name);

        let request = self
            .client
            .get(format!("{}/zones", self.base_url))
            .query(&[("name", name)]);
        let zones: Vec<ZoneResult> = self.send(request, "/zones.get").await?;

        Ok(zones
            .into_iter()
            .map(|zone| Zone {
                id: zone.id,
                name: zone.name,
            })
            .collect())
    }

    async fn list_records(&self, zone_id: &str, name: &str, family: RecordFamily) -> Result<Vec<DnsRecord>> {
        tracing::debug!("GET /zones/{}/dns_records?name={}&type={}", zone_id, name, family);

        let request = self
            .client
            .get(self.records_url(zone_id))
            .query(&[("name", name), ("type", family.as_str()), ("match", "all")]);
        let records: Vec<RecordResult> = self.send(request, "/zones.dns_records.get").await?;

        Ok(records.into_iter().map(DnsRecord::from).collect())
    }

    async fn create_record(&self, zone_id: &str, name: &str, address: &Address) -> Result<DnsRecord> {
        tracing::debug!("POST /zones/{}/dns_records ({} {})", zone_id, name, address);

        let request = self
            .client
            .post(self.records_url(zone_id))
            .json(&RecordPayload::new(name, address));
        let record: RecordResult = self.send(request, "/zones.dns_records.post").await?;

        Ok(record.into())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        address: &Address,
    ) -> Result<DnsRecord> {
        tracing::debug!("PATCH /zones/{}/dns_records/{} ({} {})", zone_id, record_id, name, address);

        let request = self
            .client
            .patch(format!("{}/{}", self.records_url(zone_id), record_id))
            .json(&RecordPayload::new(name, address));
        let record: RecordResult = self.send(request, "/zones.dns_records.patch").await?;

        Ok(record.into())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
