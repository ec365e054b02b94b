//! EC2 instance inventory

use async_trait::async_trait;
use disco_core::error::{Error, Result};
use disco_core::traits::InstanceApi;
use disco_core::types::InstanceRecord;
use tracing::debug;

/// [`InstanceApi`] over the EC2 API
#[derive(Clone)]
pub struct Ec2Instances {
    client: aws_sdk_ec2::Client,
}

impl Ec2Instances {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(config),
        }
    }
}

// Every field on the SDK instance type is optional; the domain record keeps
// that shape and lets the core layer decide which absences are fatal.
fn instance_record(instance: &aws_sdk_ec2::types::Instance) -> InstanceRecord {
    InstanceRecord {
        instance_id: instance.instance_id().unwrap_or_default().to_string(),
        private_ip: instance.private_ip_address().map(str::to_string),
        public_ip: instance.public_ip_address().map(str::to_string),
        private_dns: instance.private_dns_name().map(str::to_string),
        public_dns: instance.public_dns_name().map(str::to_string),
        tags: instance
            .tags()
            .iter()
            .filter_map(|tag| match (tag.key(), tag.value()) {
                (Some(key), Some(value)) => Some((key.to_string(), value.to_string())),
                _ => None,
            })
            .collect(),
    }
}

#[async_trait]
impl InstanceApi for Ec2Instances {
    async fn describe_instance(&self, instance_id: &str) -> Result<Vec<InstanceRecord>> {
        debug!(instance_id = %instance_id, "describing instance");
        let out = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| Error::provider("ec2", e.to_string()))?;

        Ok(out
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .map(instance_record)
            .collect())
    }
}
