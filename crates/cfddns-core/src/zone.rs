//! Zone lookup for a hostname
//!
//! The zone name is everything after the first label of the hostname. There is
//! no public-suffix awareness: `home.example.co.uk` maps to `example.co.uk`,
//! and `a.b.example.com` maps to `b.example.com`.

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{DnsProvider, Zone};

/// Derive the candidate zone name of a hostname
pub fn zone_name_for(hostname: &str) -> Result<&str> {
    match hostname.split_once('.') {
        Some((label, zone)) if !label.is_empty() && !zone.is_empty() => Ok(zone),
        _ => Err(Error::invalid_input(format!(
            "{} has no parent zone",
            hostname
        ))),
    }
}

/// Resolve the zone a hostname lives in
///
/// # Errors
///
/// - [`Error::InvalidInput`]: the hostname has a single label
/// - whatever the provider returned if the lookup call failed
/// - [`Error::ZoneNotFound`]: no zone matched
/// - [`Error::AmbiguousZone`]: more than one zone matched
pub async fn locate(provider: &dyn DnsProvider, hostname: &str) -> Result<Zone> {
    let zone_name = zone_name_for(hostname)?;
    debug!("Looking up zone {} for {}", zone_name, hostname);

    let mut zones = provider.find_zones(zone_name).await?;

    match zones.len() {
        0 => Err(Error::ZoneNotFound(zone_name.to_string())),
        1 => Ok(zones.remove(0)),
        count => Err(Error::AmbiguousZone {
            zone: zone_name.to_string(),
            count,
        }),
    }
}
