//! Record reconciliation for one hostname
//!
//! ## Flow
//!
//! 1. List records of the hostname filtered by the address family
//! 2. Same family and same content → unchanged, keep scanning
//! 3. Same family, different content → update in place
//! 4. Other family → ignored, never deleted or converted
//! 5. Nothing of the same family seen → create a record
//!
//! The first failing provider call ends reconciliation of the hostname; the
//! outcomes recorded before it stay in the report.

use tracing::debug;

use crate::address::Address;
use crate::error::Result;
use crate::report::{PassReport, RecordAction};
use crate::traits::DnsProvider;

/// Converge the records of `hostname` in `zone_id` onto `address`
pub async fn reconcile(
    provider: &dyn DnsProvider,
    report: &mut PassReport,
    zone_id: &str,
    hostname: &str,
    address: &Address,
) -> Result<()> {
    let family = address.family();
    let records = provider.list_records(zone_id, hostname, family).await?;
    debug!("{} {} record(s) found for {}", records.len(), family, hostname);

    let mut converged = false;

    for record in records {
        if !family.matches(&record.record_type) {
            report.record(
                hostname,
                RecordAction::IgnoredWrongFamily {
                    record_type: record.record_type,
                    content: record.content,
                },
            );
            continue;
        }

        if record.content == address.as_str() {
            report.record(
                hostname,
                RecordAction::Unchanged {
                    content: record.content,
                },
            );
            converged = true;
            continue;
        }

        provider
            .update_record(zone_id, &record.id, hostname, address)
            .await?;
        report.record(
            hostname,
            RecordAction::Updated {
                previous: record.content,
                current: address.to_string(),
            },
        );
        converged = true;
    }

    if converged {
        return Ok(());
    }

    provider.create_record(zone_id, hostname, address).await?;
    report.record(
        hostname,
        RecordAction::Created {
            content: address.to_string(),
        },
    );

    Ok(())
}
