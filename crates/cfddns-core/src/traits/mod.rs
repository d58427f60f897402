//! Core traits for cfddns
//!
//! - [`IpSource`]: Discover the public address
//! - [`DnsProvider`]: Read and write DNS records via provider APIs
//! - [`Notifier`]: Deliver a pass summary

pub mod ip_source;
pub mod dns_provider;
pub mod notifier;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsRecord, Zone};
pub use notifier::Notifier;
