//! Auto Scaling group lookup

use async_trait::async_trait;
use disco_core::error::{Error, Result};
use disco_core::traits::GroupApi;
use disco_core::types::GroupRecord;
use tracing::debug;

/// [`GroupApi`] over the Auto Scaling API
pub struct AutoscalingGroups {
    client: aws_sdk_autoscaling::Client,
}

impl AutoscalingGroups {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_autoscaling::Client::new(config),
        }
    }
}

fn group_record(group: &aws_sdk_autoscaling::types::AutoScalingGroup) -> GroupRecord {
    GroupRecord {
        name: group.auto_scaling_group_name().unwrap_or_default().to_string(),
        instance_ids: group
            .instances()
            .iter()
            .map(|instance| instance.instance_id().unwrap_or_default().to_string())
            .collect(),
    }
}

#[async_trait]
impl GroupApi for AutoscalingGroups {
    async fn describe_group(&self, name: &str) -> Result<Vec<GroupRecord>> {
        debug!(group = %name, "describing auto scaling group");
        let out = self
            .client
            .describe_auto_scaling_groups()
            .auto_scaling_group_names(name)
            .send()
            .await
            .map_err(|e| Error::provider("autoscaling", e.to_string()))?;

        Ok(out.auto_scaling_groups().iter().map(group_record).collect())
    }
}
