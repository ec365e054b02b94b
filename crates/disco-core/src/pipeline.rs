//! The reconciliation pipeline
//!
//! Sequences one run: resolve the group (configured or self-discovered),
//! resolve membership, sync the record, resolve the instance's own address
//! and render the etcd environment file. Data flows one direction; the
//! whole run is a single task with no fan-out.

use crate::config::Config;
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::traits::{Membership, RecordSync};
use crate::types::SyncOutcome;
use tracing::info;

/// Peer advertisement port baked into the rendered environment file
const PEER_PORT: u16 = 2380;

/// Client advertisement port baked into the rendered environment file
const CLIENT_PORT: u16 = 2379;

/// What one reconciliation run produced
#[derive(Debug)]
pub struct RunReport {
    /// How many peers were discovered
    pub peers: usize,
    /// Terminal sync outcome
    pub outcome: SyncOutcome,
    /// The calling instance's own resolved address
    pub self_address: String,
    /// Rendered etcd environment file content
    pub env_file: String,
}

/// One-shot reconciliation pipeline
pub struct Pipeline {
    membership: Box<dyn Membership>,
    syncer: Box<dyn RecordSync>,
    identity: IdentityResolver,
}

impl Pipeline {
    /// Wire a pipeline from its three collaborators
    pub fn new(
        membership: Box<dyn Membership>,
        syncer: Box<dyn RecordSync>,
        identity: IdentityResolver,
    ) -> Self {
        Self {
            membership,
            syncer,
            identity,
        }
    }

    /// Run one reconciliation
    pub async fn run(&self, config: &Config) -> Result<RunReport> {
        config.validate()?;

        let group = match &config.group {
            Some(group) => group.clone(),
            None => {
                info!("no group configured, discovering from instance tags");
                self.identity.self_group().await?
            }
        };

        let peers = self.membership.members(&group, config.address_kind).await?;
        info!(group = %group, count = peers.len(), "discovered group members");

        let outcome = self
            .syncer
            .sync_record(&config.record_spec(), &peers, config.wait)
            .await?;

        let self_address = self.identity.self_address(config.address_kind).await?;
        let env_file = render_env_file(&self_address, &config.domain, config.ssl);

        Ok(RunReport {
            peers: peers.len(),
            outcome,
            self_address,
            env_file,
        })
    }
}

/// Render the etcd environment file consumed by the discovery collaborator.
///
/// The advertised ports are fixed: etcd peers on 2380, clients on 2379.
pub fn render_env_file(self_address: &str, domain: &str, ssl: bool) -> String {
    let scheme = if ssl { "https" } else { "http" };
    format!(
        "ETCD_NAME={self_address}\n\
         ETCD_DISCOVERY_SRV={domain}\n\
         ETCD_INITIAL_ADVERTISE_PEER_URLS={scheme}://{self_address}:{PEER_PORT}\n\
         ETCD_ADVERTISE_CLIENT_URLS={scheme}://{self_address}:{CLIENT_PORT}\n"
    )
}
