//! Update loop
//!
//! The [`Updater`] drives one pass at a time:
//!
//! ```text
//! ┌──────────────────┐
//! │ AddressResolver  │── address ──┐
//! └──────────────────┘             │
//!                                  ▼
//!                          ┌──────────────┐      for each hostname, in order
//!                          │   Updater    │──────────────────────────────┐
//!                          └──────────────┘                              │
//!                                  │                                     ▼
//!                                  │                  ┌─────────────┐  ┌─────────────┐
//!                                  │                  │ zone::locate│─▶│ reconcile   │
//!                                  │                  └─────────────┘  └─────────────┘
//!                                  ▼
//!                          ┌──────────────┐
//!                          │  Notifier    │ (only when the pass warrants it)
//!                          └──────────────┘
//! ```
//!
//! ## Failure handling
//!
//! - Single-pass mode ([`Updater::run_once`]): the first failure ends the run
//!   and is returned to the caller.
//! - Looping mode ([`Updater::run_until`]): a failing hostname is recorded and the
//!   next one is processed; a failed IP lookup skips the pass; the loop always
//!   continues to the next interval.

use std::future::Future;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, error, info};

use crate::address::Address;
use crate::config::Config;
use crate::error::Result;
use crate::hostnames::HostnameList;
use crate::reconcile::reconcile;
use crate::report::PassReport;
use crate::resolver::AddressResolver;
use crate::traits::{DnsProvider, IpSource, Notifier};
use crate::zone;

/// Subject line of pass notifications
pub const NOTIFICATION_SUBJECT: &str = "cfddns";

/// What a pass does when a hostname or the IP lookup fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailurePolicy {
    /// Stop the pass and hand the error to the caller
    Abort,
    /// Record the failure and carry on
    Continue,
}

/// Drives resolution, zone lookup and reconciliation over the hostname list
pub struct Updater {
    resolver: AddressResolver,
    provider: Box<dyn DnsProvider>,
    notifier: Option<Box<dyn Notifier>>,
    hostnames: HostnameList,
    interval: Duration,
}

impl Updater {
    /// Create a new updater
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `hostnames`: hostnames processed by every pass
    /// - `config`: retry policy and interval are taken from here
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        hostnames: HostnameList,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver: AddressResolver::new(ip_source, config.retry.clone()),
            provider,
            notifier: None,
            hostnames,
            interval: config.interval(),
        })
    }

    /// Send a summary through `notifier` after passes that warrant one
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Run a single pass, stopping at the first failure
    ///
    /// # Returns
    ///
    /// - `Ok(PassReport)`: every hostname was processed
    /// - `Err(Error)`: the IP lookup or a hostname failed; later hostnames
    ///   were not processed
    pub async fn run_once(&self) -> Result<PassReport> {
        let report = self.pass(FailurePolicy::Abort).await?;
        self.notify(&report).await;
        Ok(report)
    }

    /// Run a single pass without aborting on failures
    ///
    /// A failed IP lookup yields a skipped report; a failing hostname is
    /// recorded and the remaining hostnames are still processed.
    pub async fn run_pass(&self) -> PassReport {
        match self.pass(FailurePolicy::Continue).await {
            Ok(report) => report,
            // Continue never propagates
            Err(e) => {
                let mut report = PassReport::new();
                report.skip(&e);
                report
            }
        }
    }

    /// Run passes forever, sleeping the configured interval in between
    ///
    /// Returns once `shutdown` completes. A pass in progress is never
    /// interrupted; `shutdown` is only observed while sleeping between passes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let report = self.run_pass().await;
            self.notify(&report).await;

            debug!("Next pass in {:?}", self.interval);
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
    }

    async fn pass(&self, policy: FailurePolicy) -> Result<PassReport> {
        let mut report = PassReport::new();
        report.log(format!("start: {}", Local::now().format("%Y-%m-%d %H:%M:%S%.6f")));

        debug!("Resolving address via {}", self.resolver.endpoint());
        let address = match self.resolver.resolve().await {
            Ok(address) => address,
            Err(e) => {
                report.skip(&e);
                if policy == FailurePolicy::Abort {
                    return Err(e);
                }
                return Ok(report);
            }
        };
        report.set_address(address.clone());

        for hostname in self.hostnames.iter() {
            if let Err(e) = self.process_hostname(&mut report, hostname, &address).await {
                report.fail(hostname, &e);
                if policy == FailurePolicy::Abort {
                    return Err(e);
                }
            }
        }

        report.log(format!("done: {}", Local::now().format("%Y-%m-%d %H:%M:%S%.6f")));
        Ok(report)
    }

    async fn process_hostname(
        &self,
        report: &mut PassReport,
        hostname: &str,
        address: &Address,
    ) -> Result<()> {
        debug!("pending: {}", hostname);
        let zone = zone::locate(self.provider.as_ref(), hostname).await?;
        debug!("{} is in zone {} ({})", hostname, zone.name, zone.id);

        reconcile(self.provider.as_ref(), report, &zone.id, hostname, address).await
    }

    async fn notify(&self, report: &PassReport) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        if !report.should_notify() {
            return;
        }

        if let Err(e) = notifier.notify(NOTIFICATION_SUBJECT, &report.body()).await {
            error!("Failed to send notification: {}", e);
        }
    }
}
