//! Per-pass result and log
//!
//! A [`PassReport`] is created at the start of every pass, threaded through the
//! zone lookup and reconciliation of each hostname, and handed back to the
//! driver. It holds the line-oriented log that becomes the notification body
//! and the flag deciding whether a notification is warranted.

use tracing::{info, warn};

use crate::address::Address;
use crate::error::Error;

/// What happened to one provider record during reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    /// Record already pointed at the resolved address
    Unchanged {
        /// Current content
        content: String,
    },
    /// Record content was overwritten
    Updated {
        /// Content before the update
        previous: String,
        /// Content after the update
        current: String,
    },
    /// No record of the resolved family existed, one was created
    Created {
        /// Content of the new record
        content: String,
    },
    /// Record of another family was left alone
    IgnoredWrongFamily {
        /// Record type as the provider reported it
        record_type: String,
        /// Record content
        content: String,
    },
}

impl RecordAction {
    /// Whether this action is worth telling someone about
    pub fn is_notable(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}

/// A hostname whose processing was abandoned in this pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameFailure {
    pub hostname: String,
    pub message: String,
}

/// Result and log of a single pass
#[derive(Debug, Default)]
pub struct PassReport {
    lines: Vec<String>,
    should_notify: bool,
    address: Option<Address>,
    skipped: bool,
    actions: Vec<(String, RecordAction)>,
    failures: Vec<HostnameFailure>,
}

impl PassReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain log line
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!("{}", line);
        self.lines.push(line);
    }

    /// Remember the address resolved for this pass
    pub fn set_address(&mut self, address: Address) {
        self.log(format!("ip: {}", address));
        self.address = Some(address);
    }

    /// Record the outcome for one provider record of `hostname`
    pub fn record(&mut self, hostname: &str, action: RecordAction) {
        let line = match &action {
            RecordAction::Unchanged { content } => format!("unchanged: {} {}", hostname, content),
            RecordAction::Updated { previous, current } => {
                format!("update: {} {} -> {}", hostname, previous, current)
            }
            RecordAction::Created { content } => format!("created: {} {}", hostname, content),
            RecordAction::IgnoredWrongFamily { content, .. } => {
                format!("ignored: {} {}; wrong address family", hostname, content)
            }
        };
        self.log(line);

        if action.is_notable() {
            self.should_notify = true;
        }
        self.actions.push((hostname.to_string(), action));
    }

    /// Record that `hostname` was abandoned for this pass
    pub fn fail(&mut self, hostname: &str, error: &Error) {
        let line = format!("failed: {} - {}", hostname, error);
        warn!("{}", line);
        self.lines.push(line);
        self.should_notify = true;
        self.failures.push(HostnameFailure {
            hostname: hostname.to_string(),
            message: error.to_string(),
        });
    }

    /// Record that the whole pass was skipped because no address was resolved
    pub fn skip(&mut self, error: &Error) {
        let line = format!("skipped: {}", error);
        warn!("{}", line);
        self.lines.push(line);
        self.should_notify = true;
        self.skipped = true;
    }

    /// Whether the pass warrants a notification
    pub fn should_notify(&self) -> bool {
        self.should_notify
    }

    /// Whether the pass was skipped for lack of an address
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// Address resolved for this pass
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Record outcomes in the order they happened
    pub fn actions(&self) -> &[(String, RecordAction)] {
        &self.actions
    }

    /// Hostnames abandoned in this pass
    pub fn failures(&self) -> &[HostnameFailure] {
        &self.failures
    }

    /// Log lines in the order they were recorded
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Notification body: every line of the pass
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}
