//! Self-identity resolution
//!
//! A freshly launched instance knows nothing about itself beyond what the
//! local metadata endpoint exposes. The resolver answers two questions:
//! "what is my own address" (one metadata lookup) and "which group am I a
//! member of" (metadata identifier, then an inventory lookup, then a scan
//! of the instance's tag set for the reserved group-membership key).

use crate::error::{Error, Result};
use crate::traits::{InstanceApi, MetadataApi};
use crate::types::AddressKind;
use tracing::debug;

/// Reserved tag key the platform stamps on every group member
pub const GROUP_TAG_KEY: &str = "aws:autoscaling:groupName";

/// Resolves the calling instance's own identity
pub struct IdentityResolver {
    metadata: Box<dyn MetadataApi>,
    instances: Box<dyn InstanceApi>,
}

impl IdentityResolver {
    /// Create a resolver over the given metadata and inventory edges
    pub fn new(metadata: Box<dyn MetadataApi>, instances: Box<dyn InstanceApi>) -> Self {
        Self {
            metadata,
            instances,
        }
    }

    /// The calling instance's own address of the given kind.
    ///
    /// Fails with `Error::Metadata` when the endpoint cannot be reached or
    /// the requested field is absent.
    pub async fn self_address(&self, kind: AddressKind) -> Result<String> {
        self.metadata.address(kind).await
    }

    /// The group the calling instance belongs to, discovered from its own
    /// inventory tags.
    ///
    /// This chain exists because the group name is not always supplied by
    /// the operator; a new instance must be able to find its group with no
    /// configuration at all.
    pub async fn self_group(&self) -> Result<String> {
        let instance_id = self
            .metadata
            .instance_id()
            .await
            .map_err(|e| Error::identity(format!("unable to read instance id: {e}")))?;
        debug!(instance_id = %instance_id, "looking up own inventory record");

        let records = self
            .instances
            .describe_instance(&instance_id)
            .await
            .map_err(|e| Error::inventory(format!("describe {instance_id}: {e}")))?;
        if records.len() != 1 {
            return Err(Error::inventory(format!(
                "expected one inventory record for {instance_id}, got {}",
                records.len()
            )));
        }

        records[0]
            .tags
            .get(GROUP_TAG_KEY)
            .cloned()
            .ok_or(Error::GroupTagMissing)
    }
}
