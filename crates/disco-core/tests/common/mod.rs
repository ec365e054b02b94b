//! Test doubles and common utilities for the reconciliation contract tests
//!
//! The doubles are scripted, counting implementations of the wire traits:
//! they record every call so tests can assert not just outcomes but how
//! many provider calls were made and with what payloads.

#![allow(dead_code)]

use async_trait::async_trait;
use disco_core::config::Config;
use disco_core::error::{Error, Result};
use disco_core::traits::{DnsApi, GroupApi, InstanceApi, MetadataApi};
use disco_core::types::{
    AddressKind, ChangeHandle, ChangeState, GroupRecord, InstanceRecord, RecordChange, RecordSpec,
};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A scripted DNS API double: fails the first N submits, then answers
/// status polls from a queue
#[derive(Clone, Default)]
pub struct ScriptedDnsApi {
    submit_failures: Arc<Mutex<usize>>,
    statuses: Arc<Mutex<VecDeque<ChangeState>>>,
    status_error: Arc<AtomicBool>,
    pending_forever: Arc<AtomicBool>,
    submit_calls: Arc<AtomicUsize>,
    status_calls: Arc<AtomicUsize>,
    changes: Arc<Mutex<Vec<RecordChange>>>,
}

impl ScriptedDnsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `count` submit calls, then succeed
    pub fn failing_submits(count: usize) -> Self {
        let api = Self::default();
        *api.submit_failures.lock().unwrap() = count;
        api
    }

    /// Answer status polls from this queue; an exhausted queue reports Done
    pub fn with_statuses(states: Vec<ChangeState>) -> Self {
        let api = Self::default();
        *api.statuses.lock().unwrap() = states.into();
        api
    }

    /// Every status poll fails
    pub fn with_status_error() -> Self {
        let api = Self::default();
        api.status_error.store(true, Ordering::SeqCst);
        api
    }

    /// Every status poll reports Pending
    pub fn pending_forever() -> Self {
        let api = Self::default();
        api.pending_forever.store(true, Ordering::SeqCst);
        api
    }

    pub fn submit_call_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_call_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Every change that was accepted, in submission order
    pub fn submitted_changes(&self) -> Vec<RecordChange> {
        self.changes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsApi for ScriptedDnsApi {
    async fn submit_change(&self, change: &RecordChange) -> Result<ChangeHandle> {
        let call = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut failures = self.submit_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::provider("scripted", "change submission refused"));
            }
        }
        self.changes.lock().unwrap().push(change.clone());
        Ok(ChangeHandle {
            id: format!("chg-{call}"),
            state: ChangeState::Pending,
        })
    }

    async fn change_status(&self, _change_id: &str) -> Result<ChangeState> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.status_error.load(Ordering::SeqCst) {
            return Err(Error::provider("scripted", "status endpoint unavailable"));
        }
        if self.pending_forever.load(Ordering::SeqCst) {
            return Ok(ChangeState::Pending);
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ChangeState::Done))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// A group-management API double answering from a fixed set of records
#[derive(Clone)]
pub struct StaticGroupApi {
    groups: Arc<Vec<GroupRecord>>,
    calls: Arc<AtomicUsize>,
}

impl StaticGroupApi {
    pub fn new(groups: Vec<GroupRecord>) -> Self {
        Self {
            groups: Arc::new(groups),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroupApi for StaticGroupApi {
    async fn describe_group(&self, name: &str) -> Result<Vec<GroupRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .groups
            .iter()
            .filter(|group| group.name == name)
            .cloned()
            .collect())
    }
}

/// An inventory API double answering from a fixed map, optionally failing
/// for one instance reference
#[derive(Clone, Default)]
pub struct StaticInstanceApi {
    records: Arc<Mutex<HashMap<String, Vec<InstanceRecord>>>>,
    fail_on: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
}

impl StaticInstanceApi {
    pub fn from_records(records: Vec<InstanceRecord>) -> Self {
        let api = Self::default();
        {
            let mut map = api.records.lock().unwrap();
            for record in records {
                map.insert(record.instance_id.clone(), vec![record]);
            }
        }
        api
    }

    /// Map one reference to several records (an inconsistent inventory)
    pub fn with_duplicate(self, instance_id: &str) -> Self {
        let mut map = self.records.lock().unwrap();
        if let Some(records) = map.get_mut(instance_id) {
            let copy = records[0].clone();
            records.push(copy);
        }
        drop(map);
        self
    }

    /// Fail lookups for this reference
    pub fn failing_on(self, instance_id: &str) -> Self {
        *self.fail_on.lock().unwrap() = Some(instance_id.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstanceApi for StaticInstanceApi {
    async fn describe_instance(&self, instance_id: &str) -> Result<Vec<InstanceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.lock().unwrap().as_deref() == Some(instance_id) {
            return Err(Error::provider("inventory", "scripted lookup failure"));
        }
        self.records
            .lock()
            .unwrap()
            .get(instance_id)
            .cloned()
            .ok_or_else(|| Error::provider("inventory", format!("no such instance {instance_id}")))
    }
}

/// A metadata endpoint double describing the calling instance
#[derive(Clone)]
pub struct StaticMetadataApi {
    instance_id: Option<String>,
    region: String,
    own_record: InstanceRecord,
}

impl StaticMetadataApi {
    pub fn new(instance_id: &str, own_record: InstanceRecord) -> Self {
        Self {
            instance_id: Some(instance_id.to_string()),
            region: "us-east-1".to_string(),
            own_record,
        }
    }

    /// A metadata endpoint that cannot identify the instance
    pub fn without_identity(own_record: InstanceRecord) -> Self {
        Self {
            instance_id: None,
            region: "us-east-1".to_string(),
            own_record,
        }
    }
}

#[async_trait]
impl MetadataApi for StaticMetadataApi {
    async fn instance_id(&self) -> Result<String> {
        self.instance_id
            .clone()
            .ok_or_else(|| Error::metadata("instance-id unavailable"))
    }

    async fn region(&self) -> Result<String> {
        Ok(self.region.clone())
    }

    async fn address(&self, kind: AddressKind) -> Result<String> {
        self.own_record
            .address(kind)
            .map(str::to_string)
            .ok_or_else(|| Error::metadata(format!("no {kind} metadata field")))
    }
}

/// An instance record with only a private IP
pub fn instance(instance_id: &str, private_ip: &str) -> InstanceRecord {
    InstanceRecord {
        instance_id: instance_id.to_string(),
        private_ip: Some(private_ip.to_string()),
        ..Default::default()
    }
}

/// An instance record carrying the reserved group-membership tag
pub fn tagged_instance(instance_id: &str, private_ip: &str, group: &str) -> InstanceRecord {
    let mut record = instance(instance_id, private_ip);
    record.tags.insert(
        disco_core::identity::GROUP_TAG_KEY.to_string(),
        group.to_string(),
    );
    record
}

/// A group record over the given member references
pub fn group(name: &str, instance_ids: &[&str]) -> GroupRecord {
    GroupRecord {
        name: name.to_string(),
        instance_ids: instance_ids.iter().map(|id| id.to_string()).collect(),
    }
}

/// The record spec used throughout the suites
pub fn test_spec() -> RecordSpec {
    RecordSpec {
        domain: "etcd.local".to_string(),
        port: 2380,
        ttl: 60,
        ssl: false,
    }
}

/// A valid configuration for pipeline tests
pub fn test_config() -> Config {
    Config {
        zone_id: "Z123".to_string(),
        domain: "etcd.local".to_string(),
        ssl: false,
        port: 2380,
        ttl: 60,
        wait: false,
        max_wait_secs: None,
        region: None,
        group: Some("web-1".to_string()),
        address_kind: AddressKind::PrivateIp,
        file: PathBuf::from("/etc/disco/etcd-discovery"),
    }
}
