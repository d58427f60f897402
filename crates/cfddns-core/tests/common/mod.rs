//! Test doubles and common utilities for contract tests
//!
//! The doubles record every call so tests can assert on exactly which provider
//! calls a pass made.

#![allow(dead_code)]

use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{DnsProvider, DnsRecord, IpSource, Notifier, Zone};
use cfddns_core::{Address, Config, HostnameList, RecordFamily, RetryConfig};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ENDPOINT: &str = "https://ip.test";

/// One scripted answer of the IP echo endpoint
#[derive(Debug, Clone)]
pub enum Reply {
    Address(&'static str),
    Status(u16),
    Empty,
}

impl Reply {
    fn into_result(self) -> Result<Address> {
        match self {
            Reply::Address(text) => Address::parse(text).ok_or_else(|| Error::EmptyAddress(ENDPOINT.to_string())),
            Reply::Status(status) => Err(Error::IpStatus {
                endpoint: ENDPOINT.to_string(),
                status,
            }),
            Reply::Empty => Err(Error::EmptyAddress(ENDPOINT.to_string())),
        }
    }
}

/// An IpSource that plays back scripted replies, then repeats a fallback
#[derive(Clone)]
pub struct ScriptedIpSource {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Reply,
    fetch_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    /// Always answer with `address`
    pub fn always(address: &'static str) -> Self {
        Self::scripted(Vec::new(), Reply::Address(address))
    }

    /// Answer with `replies` in order, then with `fallback` forever
    pub fn scripted(replies: Vec<Reply>, fallback: Reply) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            fallback,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times fetch() was called
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn fetch(&self) -> Result<Address> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.into_result()
    }

    fn endpoint(&self) -> &str {
        ENDPOINT
    }
}

#[derive(Default)]
struct ProviderState {
    zones: Vec<Zone>,
    records: Vec<(String, DnsRecord)>,
    next_id: usize,
    zone_lookup_error: bool,
    fail_updates: bool,
    fail_creates: bool,
    ignore_type_filter: bool,
}

/// An in-memory DnsProvider that tracks calls
///
/// Clones share state and counters.
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    state: Arc<Mutex<ProviderState>>,
    find_zones_count: Arc<AtomicUsize>,
    list_count: Arc<AtomicUsize>,
    create_count: Arc<AtomicUsize>,
    update_count: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(self, name: &str, id: &str) -> Self {
        self.state.lock().unwrap().zones.push(Zone {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_record(self, zone_id: &str, name: &str, record_type: &str, content: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let record = DnsRecord {
                id: format!("rec-{}", state.next_id),
                name: name.to_string(),
                record_type: record_type.to_string(),
                content: content.to_string(),
            };
            state.records.push((zone_id.to_string(), record));
        }
        self
    }

    /// Make zone lookups fail like a rejected token
    pub fn failing_zone_lookup(self) -> Self {
        self.state.lock().unwrap().zone_lookup_error = true;
        self
    }

    pub fn failing_updates(self) -> Self {
        self.state.lock().unwrap().fail_updates = true;
        self
    }

    pub fn failing_creates(self) -> Self {
        self.state.lock().unwrap().fail_creates = true;
        self
    }

    /// Return records of every type from list_records()
    pub fn ignoring_type_filter(self) -> Self {
        self.state.lock().unwrap().ignore_type_filter = true;
        self
    }

    pub fn find_zones_count(&self) -> usize {
        self.find_zones_count.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.update_count.load(Ordering::SeqCst)
    }

    /// Number of calls that would modify provider state
    pub fn write_count(&self) -> usize {
        self.create_count() + self.update_count()
    }

    /// Snapshot of the records stored for `name`
    pub fn records_for(&self, name: &str) -> Vec<DnsRecord> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|(_, r)| r.name == name)
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn find_zones(&self, name: &str) -> Result<Vec<Zone>> {
        self.find_zones_count.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.zone_lookup_error {
            return Err(Error::auth("Invalid API token"));
        }
        Ok(state.zones.iter().filter(|z| z.name == name).cloned().collect())
    }

    async fn list_records(&self, zone_id: &str, name: &str, family: RecordFamily) -> Result<Vec<DnsRecord>> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|(z, r)| z == zone_id && r.name == name)
            .filter(|(_, r)| state.ignore_type_filter || family.matches(&r.record_type))
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn create_record(&self, zone_id: &str, name: &str, address: &Address) -> Result<DnsRecord> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.fail_creates {
            return Err(Error::provider("mock", "create rejected"));
        }
        state.next_id += 1;
        let record = DnsRecord {
            id: format!("rec-{}", state.next_id),
            name: name.to_string(),
            record_type: address.family().to_string(),
            content: address.to_string(),
        };
        state.records.push((zone_id.to_string(), record.clone()));
        Ok(record)
    }

    async fn update_record(&self, _zone_id: &str, record_id: &str, _name: &str, address: &Address) -> Result<DnsRecord> {
        self.update_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.fail_updates {
            return Err(Error::provider("mock", "update rejected"));
        }
        let (_, record) = state
            .records
            .iter_mut()
            .find(|(_, r)| r.id == record_id)
            .ok_or_else(|| Error::provider("mock", "no such record"))?;
        record.content = address.to_string();
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A Notifier that keeps every message
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far as (subject, body)
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// A Notifier whose every send fails, like an unreachable relay
#[derive(Clone, Default)]
pub struct FailingNotifier {
    calls: Arc<AtomicUsize>,
}

impl FailingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of times notify() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _subject: &str, _body: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::notification("smtp down"))
    }
}

/// Configuration with no retry delay and a one minute interval
pub fn test_config() -> Config {
    let mut config = Config::new("test-token");
    config.interval = 60;
    config.retry = RetryConfig {
        attempts: 3,
        delay_secs: 0,
    };
    config
}

pub fn hostnames(names: &[&str]) -> HostnameList {
    HostnameList::new(names.iter().copied()).expect("non-empty hostname list")
}

pub fn address(text: &str) -> Address {
    Address::parse(text).expect("non-empty address")
}
