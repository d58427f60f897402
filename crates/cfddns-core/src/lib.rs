// # cfddns-core
//
// Core library of the cfddns dynamic DNS updater.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for discovering the public address (one attempt per call)
// - **AddressResolver**: Retry policy around an IpSource
// - **DnsProvider**: Trait for zone and record calls against a provider API
// - **zone / reconcile**: Zone lookup and per-hostname record convergence
// - **Updater**: Drives passes over the hostname list, once or on an interval
// - **Notifier**: Trait for delivering the summary of a pass
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP/SMTP plumbing
// 2. **Stateless**: Every pass re-derives everything from the provider
// 3. **Explicit results**: Each pass returns a `PassReport`, errors propagate as `Result`
// 4. **Library-First**: The binary is a thin wrapper around `Updater`

pub mod address;
pub mod traits;
pub mod config;
pub mod error;
pub mod hostnames;
pub mod report;
pub mod resolver;
pub mod zone;
pub mod reconcile;
pub mod engine;

// Re-export core types for convenience
pub use address::{Address, RecordFamily};
pub use traits::{DnsProvider, DnsRecord, IpSource, Notifier, Zone};
pub use config::{Config, NotificationConfig, RetryConfig};
pub use error::{Error, Result};
pub use hostnames::HostnameList;
pub use report::{HostnameFailure, PassReport, RecordAction};
pub use resolver::AddressResolver;
pub use engine::Updater;
