//! End-to-end pipeline scenarios over scripted wire doubles.
//!
//! These wire the real membership resolver, record syncer and identity
//! resolver together, replacing only the outermost provider edges.

mod common;

use common::{
    ScriptedDnsApi, StaticGroupApi, StaticInstanceApi, StaticMetadataApi, group, instance,
    tagged_instance, test_config,
};
use disco_core::error::Error;
use disco_core::identity::IdentityResolver;
use disco_core::membership::GroupMembership;
use disco_core::pipeline::Pipeline;
use disco_core::syncer::RecordSyncer;
use disco_core::types::{ChangeState, InstanceRecord, SyncOutcome};

fn fleet() -> Vec<InstanceRecord> {
    vec![
        tagged_instance("i-1", "10.0.0.1", "web-1"),
        tagged_instance("i-2", "10.0.0.2", "web-1"),
        tagged_instance("i-3", "10.0.0.3", "web-1"),
    ]
}

fn pipeline_over(dns: &ScriptedDnsApi, records: Vec<InstanceRecord>) -> Pipeline {
    let groups = StaticGroupApi::new(vec![group("web-1", &["i-1", "i-2", "i-3"])]);
    let instances = StaticInstanceApi::from_records(records.clone());
    let metadata = StaticMetadataApi::new("i-1", records[0].clone());
    Pipeline::new(
        Box::new(GroupMembership::new(Box::new(groups), Box::new(instances.clone()))),
        Box::new(RecordSyncer::new(Box::new(dns.clone()))),
        IdentityResolver::new(Box::new(metadata), Box::new(instances)),
    )
}

#[tokio::test(start_paused = true)]
async fn full_run_submits_the_srv_record_and_renders_the_env_file() {
    let dns = ScriptedDnsApi::new();
    let pipeline = pipeline_over(&dns, fleet());

    let report = pipeline.run(&test_config()).await.unwrap();

    assert_eq!(report.peers, 3);
    assert!(matches!(report.outcome, SyncOutcome::Submitted { .. }));
    assert_eq!(report.self_address, "10.0.0.1");

    let changes = dns.submitted_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].name, "_etcd-server._tcp.etcd.local");
    assert_eq!(changes[0].ttl, 60);
    assert_eq!(
        changes[0].values,
        vec!["0 0 2380 10.0.0.1", "0 0 2380 10.0.0.2", "0 0 2380 10.0.0.3"]
    );

    assert_eq!(
        report.env_file,
        "ETCD_NAME=10.0.0.1\n\
         ETCD_DISCOVERY_SRV=etcd.local\n\
         ETCD_INITIAL_ADVERTISE_PEER_URLS=http://10.0.0.1:2380\n\
         ETCD_ADVERTISE_CLIENT_URLS=http://10.0.0.1:2379\n"
    );
}

#[tokio::test(start_paused = true)]
async fn tls_run_uses_the_ssl_record_name_and_https_urls() {
    let dns = ScriptedDnsApi::new();
    let pipeline = pipeline_over(&dns, fleet());
    let mut config = test_config();
    config.ssl = true;

    let report = pipeline.run(&config).await.unwrap();

    assert_eq!(
        dns.submitted_changes()[0].name,
        "_etcd-server-ssl._tcp.etcd.local"
    );
    assert!(
        report
            .env_file
            .contains("ETCD_INITIAL_ADVERTISE_PEER_URLS=https://10.0.0.1:2380")
    );
    assert!(
        report
            .env_file
            .contains("ETCD_ADVERTISE_CLIENT_URLS=https://10.0.0.1:2379")
    );
}

#[tokio::test(start_paused = true)]
async fn group_is_discovered_from_tags_when_not_configured() {
    let dns = ScriptedDnsApi::new();
    let pipeline = pipeline_over(&dns, fleet());
    let mut config = test_config();
    config.group = None;

    let report = pipeline.run(&config).await.unwrap();

    assert_eq!(report.peers, 3);
    assert_eq!(dns.submitted_changes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn waiting_run_confirms_the_change() {
    let dns = ScriptedDnsApi::with_statuses(vec![ChangeState::Pending, ChangeState::Done]);
    let pipeline = pipeline_over(&dns, fleet());
    let mut config = test_config();
    config.wait = true;

    let report = pipeline.run(&config).await.unwrap();

    assert!(report.outcome.is_confirmed());
    assert_eq!(dns.status_call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn invalid_configuration_fails_before_any_provider_call() {
    let dns = ScriptedDnsApi::new();
    let pipeline = pipeline_over(&dns, fleet());
    let mut config = test_config();
    config.ttl = 0;

    let err = pipeline.run(&config).await.unwrap_err();

    assert!(err.is_config());
    assert_eq!(dns.submit_call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn untagged_fleet_cannot_self_discover() {
    let dns = ScriptedDnsApi::new();
    let pipeline = pipeline_over(
        &dns,
        vec![
            instance("i-1", "10.0.0.1"),
            instance("i-2", "10.0.0.2"),
            instance("i-3", "10.0.0.3"),
        ],
    );
    let mut config = test_config();
    config.group = None;

    let err = pipeline.run(&config).await.unwrap_err();

    assert!(matches!(err, Error::GroupTagMissing));
    assert_eq!(dns.submit_call_count(), 0);
}
