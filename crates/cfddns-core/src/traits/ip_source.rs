// # IP Source Trait
//
// Defines the interface for discovering the caller's public address.
//
// ## Implementations
//
// - HTTP echo endpoint: `cfddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> cfddns_core::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let address = source.fetch().await?;
//     println!("{} ({})", address, address.family());
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::address::Address;

/// Trait for IP source implementations
///
/// An implementation performs exactly one lookup per call to [`IpSource::fetch`].
/// Retrying is owned by [`crate::resolver::AddressResolver`], which consults
/// [`crate::Error::is_retryable`] to decide whether another attempt is made.
///
/// # Errors
///
/// - [`crate::Error::IpStatus`]: the endpoint answered with a non-success status
/// - [`crate::Error::IpTransport`]: the endpoint could not be reached
/// - [`crate::Error::EmptyAddress`]: the endpoint answered with an empty body
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public address (single attempt)
    async fn fetch(&self) -> Result<Address, crate::Error>;

    /// Endpoint description used in log lines
    fn endpoint(&self) -> &str;
}
