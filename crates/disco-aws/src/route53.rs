//! Route 53 change submission and status polling
//!
//! One `submit_change` call is one UPSERT batch replacing the SRV record
//! set wholesale; one `change_status` call is one GetChange round trip.
//! Retry and polling cadence live in disco-core's record syncer.

use async_trait::async_trait;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus, ResourceRecord,
    ResourceRecordSet, RrType,
};
use disco_core::error::{Error, Result};
use disco_core::traits::DnsApi;
use disco_core::types::{ChangeHandle, ChangeState, RecordChange};
use tracing::debug;

/// [`DnsApi`] over the Route 53 API, scoped to one hosted zone
pub struct Route53Dns {
    client: aws_sdk_route53::Client,
    zone_id: String,
}

impl Route53Dns {
    pub fn new(config: &aws_config::SdkConfig, zone_id: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_route53::Client::new(config),
            zone_id: zone_id.into(),
        }
    }
}

fn to_change_batch(change: &RecordChange) -> Result<ChangeBatch> {
    let mut record_set = ResourceRecordSet::builder()
        .name(&change.name)
        .r#type(RrType::Srv)
        .ttl(change.ttl);
    for value in &change.values {
        record_set = record_set.resource_records(
            ResourceRecord::builder()
                .value(value)
                .build()
                .map_err(|e| Error::provider("route53", e.to_string()))?,
        );
    }

    ChangeBatch::builder()
        .comment(&change.comment)
        .changes(
            Change::builder()
                .action(ChangeAction::Upsert)
                .resource_record_set(
                    record_set
                        .build()
                        .map_err(|e| Error::provider("route53", e.to_string()))?,
                )
                .build()
                .map_err(|e| Error::provider("route53", e.to_string()))?,
        )
        .build()
        .map_err(|e| Error::provider("route53", e.to_string()))
}

fn state_of(status: &ChangeStatus) -> ChangeState {
    if matches!(status, ChangeStatus::Pending) {
        ChangeState::Pending
    } else {
        ChangeState::Done
    }
}

fn handle_of(info: &ChangeInfo) -> ChangeHandle {
    ChangeHandle {
        id: info.id().to_string(),
        state: state_of(info.status()),
    }
}

#[async_trait]
impl DnsApi for Route53Dns {
    async fn submit_change(&self, change: &RecordChange) -> Result<ChangeHandle> {
        debug!(
            record = %change.name,
            values = change.values.len(),
            zone_id = %self.zone_id,
            "submitting route53 change batch"
        );
        let batch = to_change_batch(change)?;
        let out = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&self.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| Error::provider("route53", e.to_string()))?;

        let info = out
            .change_info()
            .ok_or_else(|| Error::provider("route53", "response missing change info"))?;
        Ok(handle_of(info))
    }

    async fn change_status(&self, change_id: &str) -> Result<ChangeState> {
        let out = self
            .client
            .get_change()
            .id(change_id)
            .send()
            .await
            .map_err(|e| Error::provider("route53", e.to_string()))?;

        let info = out
            .change_info()
            .ok_or_else(|| Error::provider("route53", "response missing change info"))?;
        Ok(state_of(info.status()))
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}
