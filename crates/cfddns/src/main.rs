// # cfddns - Dynamic DNS updater for Cloudflare
//
// Thin integration layer: parses the command line, loads the configuration
// and hostname list, wires the HTTP IP source, the Cloudflare provider and the
// optional mail notifier into a `cfddns_core::Updater`, and runs it.
//
// ## Usage
//
// ```bash
// cfddns domains.txt --config config.yml          # loop every `interval` seconds
// cfddns domains.txt --config config.yml --once   # single pass, exit on first failure
// ```
//
// ## Environment
//
// - `CFDDNS_CONFIG`: Path to the config file (instead of `--config`)
// - `CFDDNS_LOG_LEVEL`: trace, debug, info, warn or error (default: info)

use anyhow::{Context, Result};
use cfddns_core::{Config, HostnameList, NotificationConfig, Updater};
use cfddns_ip_http::HttpIpSource;
use cfddns_provider_cloudflare::CloudflareProvider;
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown or successful single pass
/// - 1: Configuration or startup error
/// - 2: A single pass failed
#[derive(Debug, Clone, Copy)]
enum CfddnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Single pass aborted on a failure
    RuntimeError = 2,
}

impl From<CfddnsExitCode> for ExitCode {
    fn from(code: CfddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Yet another DDNS client for Cloudflare.\n\
                  Keeps the A/AAAA records of every hostname in DOMAINS pointed at this host's public address."
)]
struct Args {
    /// Path to hostname list file (one FQDN per line)
    domains: PathBuf,

    /// Path to config file
    #[arg(short, long, env = "CFDDNS_CONFIG")]
    config: PathBuf,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CFDDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(log_level) = parse_level(&args.log_level) else {
        eprintln!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            args.log_level
        );
        return CfddnsExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CfddnsExitCode::ConfigError.into();
    }

    let (config, updater) = match build(&args) {
        Ok(built) => built,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return CfddnsExitCode::ConfigError.into();
        }
    };

    info!("interval: {}", config.interval);
    info!("endpoint: {}", config.endpoint);

    // Passes are strictly sequential, one thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CfddnsExitCode::ConfigError.into();
        }
    };

    let result = rt.block_on(async {
        if args.once {
            return run(&updater, true, std::future::pending()).await;
        }

        // Installed before the first pass so a signal during it is not lost
        let signals = match ShutdownSignals::install() {
            Ok(signals) => signals,
            Err(e) => {
                error!("Failed to set up signal handlers: {}", e);
                return CfddnsExitCode::ConfigError;
            }
        };
        run(&updater, false, signals.recv()).await
    });

    result.into()
}

/// Run a single pass or loop until `shutdown` completes
///
/// `shutdown` is ignored in single-pass mode.
async fn run<F>(updater: &Updater, once: bool, shutdown: F) -> CfddnsExitCode
where
    F: Future<Output = ()>,
{
    if once {
        return match updater.run_once().await {
            Ok(_) => CfddnsExitCode::CleanShutdown,
            Err(e) => {
                error!("{}", e);
                CfddnsExitCode::RuntimeError
            }
        };
    }

    updater.run_until(shutdown).await;
    info!("Shutting down");
    CfddnsExitCode::CleanShutdown
}

/// Load configuration and hostnames and assemble the updater
fn build(args: &Args) -> Result<(Config, Updater)> {
    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let hostnames = HostnameList::load(&args.domains)
        .with_context(|| format!("failed to load {}", args.domains.display()))?;
    info!("Managing {} hostname(s)", hostnames.len());

    let ip_source = HttpIpSource::new(config.endpoint.clone())?;
    let provider = CloudflareProvider::new(config.token.clone())?;

    let updater = Updater::new(Box::new(ip_source), Box::new(provider), hostnames, &config)?;
    let updater = match config.enabled_notification() {
        Some(notification) => attach_notifier(updater, notification)?,
        None => updater,
    };

    Ok((config, updater))
}

#[cfg(feature = "mail")]
fn attach_notifier(updater: Updater, notification: &NotificationConfig) -> Result<Updater> {
    info!("Notifying {} after passes with changes", notification.to);
    let notifier = cfddns_notify_mail::MailNotifier::from_config(notification)?;
    Ok(updater.with_notifier(Box::new(notifier)))
}

#[cfg(not(feature = "mail"))]
fn attach_notifier(updater: Updater, _notification: &NotificationConfig) -> Result<Updater> {
    tracing::warn!("notification is enabled but cfddns was built without the `mail` feature");
    Ok(updater)
}

/// SIGTERM and SIGINT handlers, registered when constructed
#[cfg(unix)]
struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> std::io::Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    async fn recv(mut self) {
        let name = tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        };
        info!("Received {}", name);
    }
}

/// Ctrl-C handler, registered when constructed
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
struct ShutdownSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(not(unix))]
impl ShutdownSignals {
    fn install() -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(mut self) {
        self.ctrl_c.recv().await;
        info!("Received CTRL-C");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfddns_core::traits::{DnsProvider, DnsRecord, IpSource, Zone};
    use cfddns_core::{Address, Error, RecordFamily};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["cfddns", "domains.txt", "-c", "config.yml", "--once"]).unwrap();
        assert_eq!(args.domains, PathBuf::from("domains.txt"));
        assert_eq!(args.config, PathBuf::from("config.yml"));
        assert!(args.once);

        let args = Args::try_parse_from(["cfddns", "domains.txt", "--config", "config.yml"]).unwrap();
        assert!(!args.once);
    }

    struct FixedIp;

    #[async_trait::async_trait]
    impl IpSource for FixedIp {
        async fn fetch(&self) -> cfddns_core::Result<Address> {
            Ok(Address::parse("1.2.3.4").unwrap())
        }

        fn endpoint(&self) -> &str {
            "https://ip.test"
        }
    }

    /// Provider holding one up-to-date A record, or rejecting every call
    struct StaticProvider {
        reject: bool,
    }

    #[async_trait::async_trait]
    impl DnsProvider for StaticProvider {
        async fn find_zones(&self, name: &str) -> cfddns_core::Result<Vec<Zone>> {
            if self.reject {
                return Err(Error::auth("Invalid API token"));
            }
            Ok(vec![Zone {
                id: "zone-1".to_string(),
                name: name.to_string(),
            }])
        }

        async fn list_records(
            &self,
            _zone_id: &str,
            name: &str,
            _family: RecordFamily,
        ) -> cfddns_core::Result<Vec<DnsRecord>> {
            Ok(vec![DnsRecord {
                id: "rec-1".to_string(),
                name: name.to_string(),
                record_type: "A".to_string(),
                content: "1.2.3.4".to_string(),
            }])
        }

        async fn create_record(&self, _: &str, _: &str, _: &Address) -> cfddns_core::Result<DnsRecord> {
            Err(Error::provider("static", "read-only"))
        }

        async fn update_record(&self, _: &str, _: &str, _: &str, _: &Address) -> cfddns_core::Result<DnsRecord> {
            Err(Error::provider("static", "read-only"))
        }

        fn provider_name(&self) -> &'static str {
            "static"
        }
    }

    fn test_updater(reject: bool) -> Updater {
        let hostnames = HostnameList::new(["home.example.com"]).unwrap();
        Updater::new(
            Box::new(FixedIp),
            Box::new(StaticProvider { reject }),
            hostnames,
            &Config::new("token"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_single_pass_failure_exit_code() {
        let code = run(&test_updater(true), true, std::future::pending()).await;
        assert!(matches!(code, CfddnsExitCode::RuntimeError));
        assert_eq!(code as u8, 2);
    }

    #[tokio::test]
    async fn test_single_pass_success_exit_code() {
        let code = run(&test_updater(false), true, std::future::pending()).await;
        assert!(matches!(code, CfddnsExitCode::CleanShutdown));
    }

    #[tokio::test]
    async fn test_loop_shutdown_exit_code() {
        // Failing hostnames do not end the loop, only the shutdown future does
        let code = run(&test_updater(true), false, std::future::ready(())).await;
        assert!(matches!(code, CfddnsExitCode::CleanShutdown));
        assert_eq!(code as u8, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_before_first_pass_ends_loop() {
        let signals = ShutdownSignals::install().unwrap();

        // Delivered before the loop starts; must not kill the process or get lost
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let code = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            run(&test_updater(false), false, signals.recv()),
        )
        .await
        .expect("loop stops on the queued signal");
        assert!(matches!(code, CfddnsExitCode::CleanShutdown));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("warn"), Some(Level::WARN));
        assert_eq!(parse_level("verbose"), None);
    }
}
