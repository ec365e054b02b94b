//! Group membership resolution over the inventory wire traits

use crate::error::{Error, Result};
use crate::traits::{GroupApi, InstanceApi, Membership};
use crate::types::{AddressKind, MembershipSet};
use async_trait::async_trait;
use tracing::debug;

/// Resolves autoscaling group membership through the group-management and
/// instance inventory APIs.
///
/// One `members` call is one group query plus one inventory query per
/// member reference, in provider order. No retries happen at this layer.
pub struct GroupMembership {
    groups: Box<dyn GroupApi>,
    instances: Box<dyn InstanceApi>,
}

impl GroupMembership {
    /// Create a membership provider over the given wire edges
    pub fn new(groups: Box<dyn GroupApi>, instances: Box<dyn InstanceApi>) -> Self {
        Self { groups, instances }
    }
}

#[async_trait]
impl Membership for GroupMembership {
    async fn members(&self, group: &str, kind: AddressKind) -> Result<MembershipSet> {
        debug!(group = %group, "searching for autoscaling group");
        let matches = self.groups.describe_group(group).await?;
        let record = match matches.as_slice() {
            [] => return Err(Error::GroupNotFound(group.to_string())),
            [record] => record,
            // More than one match for a unique name is an unexpected
            // provider condition; picking one silently is never correct.
            _ => {
                return Err(Error::AmbiguousGroup {
                    name: group.to_string(),
                    count: matches.len(),
                });
            }
        };

        let mut peers = Vec::with_capacity(record.instance_ids.len());
        for instance_id in &record.instance_ids {
            let records = self
                .instances
                .describe_instance(instance_id)
                .await
                .map_err(|e| Error::inventory(format!("member {instance_id}: {e}")))?;
            for instance in &records {
                let address = instance.address(kind).ok_or_else(|| {
                    Error::inventory(format!(
                        "instance {} has no {kind} address",
                        instance.instance_id
                    ))
                })?;
                peers.push(address.to_string());
            }
        }
        debug!(group = %group, count = peers.len(), "resolved group membership");
        Ok(peers)
    }
}
