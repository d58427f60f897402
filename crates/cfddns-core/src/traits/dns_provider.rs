// # DNS Provider Trait
//
// Defines the interface for reading and writing DNS records via a provider API.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::{Address, DnsProvider, RecordFamily};
//
// #[tokio::main]
// async fn main() -> cfddns_core::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let zones = provider.find_zones("example.com").await?;
//     let records = provider
//         .list_records(&zones[0].id, "home.example.com", RecordFamily::A)
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::address::{Address, RecordFamily};

/// A provider-managed zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Zone identifier (provider-specific)
    pub id: String,
    /// Zone name (e.g. "example.com")
    pub name: String,
}

/// A DNS record as stored by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Record identifier (provider-specific)
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record type as the provider reports it ("A", "AAAA", ...)
    pub record_type: String,
    /// Record content (the address for A/AAAA records)
    pub content: String,
}

/// Trait for DNS provider implementations
///
/// Providers are stateless and single-shot: one API call per method, no retry,
/// no caching. Every failure is returned to the caller, which decides whether
/// the hostname or the whole run is abandoned.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List zones whose name equals `name` exactly
    async fn find_zones(&self, name: &str) -> Result<Vec<Zone>, crate::Error>;

    /// List records in a zone matching a hostname and record family
    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        family: RecordFamily,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a record pointing `name` at `address`
    async fn create_record(
        &self,
        zone_id: &str,
        name: &str,
        address: &Address,
    ) -> Result<DnsRecord, crate::Error>;

    /// Overwrite an existing record with `address`
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        address: &Address,
    ) -> Result<DnsRecord, crate::Error>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}
