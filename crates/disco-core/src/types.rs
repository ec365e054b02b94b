//! Domain types shared across the reconciliation pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// SRV record owner name prefix for plaintext etcd peers
pub const RECORD_PREFIX: &str = "_etcd-server._tcp";

/// SRV record owner name prefix for TLS etcd peers
pub const SSL_RECORD_PREFIX: &str = "_etcd-server-ssl._tcp";

/// Human-readable comment attached to every submitted change, identifying
/// this tool as the author
pub const CHANGE_COMMENT: &str = "Managed by disco";

/// Which field of a peer's inventory record is used as its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressKind {
    /// Private IP address
    PrivateIp,
    /// Public IP address
    PublicIp,
    /// Private DNS hostname
    PrivateDns,
    /// Public DNS hostname
    PublicDns,
}

impl AddressKind {
    /// All recognized kinds, in the order they are documented
    pub const ALL: [AddressKind; 4] = [
        AddressKind::PrivateIp,
        AddressKind::PublicIp,
        AddressKind::PrivateDns,
        AddressKind::PublicDns,
    ];

    /// The configuration token for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressKind::PrivateIp => "private-ip",
            AddressKind::PublicIp => "public-ip",
            AddressKind::PrivateDns => "private-dns",
            AddressKind::PublicDns => "public-dns",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private-ip" => Ok(AddressKind::PrivateIp),
            "public-ip" => Ok(AddressKind::PublicIp),
            "private-dns" => Ok(AddressKind::PrivateDns),
            "public-dns" => Ok(AddressKind::PublicDns),
            other => Err(crate::Error::config(format!(
                "invalid address kind {:?}, expected one of: private-ip, public-ip, \
                 private-dns, public-dns",
                other
            ))),
        }
    }
}

/// One cluster member's network address, as an opaque string (IP literal or
/// DNS hostname depending on the [`AddressKind`] that produced it)
pub type PeerAddress = String;

/// The ordered list of peer addresses for one group at one point in time.
///
/// Order carries no meaning (the inventory API guarantees neither dedup nor
/// sort) but is preserved through the pipeline unchanged.
pub type MembershipSet = Vec<PeerAddress>;

/// One group record returned by the group-management API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// The group's name
    pub name: String,
    /// References to the group's member instances, in provider order
    pub instance_ids: Vec<String>,
}

/// One instance record returned by the inventory API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceRecord {
    /// The instance's unique identifier
    pub instance_id: String,
    /// Private IP address, if assigned
    pub private_ip: Option<String>,
    /// Public IP address, if assigned
    pub public_ip: Option<String>,
    /// Private DNS hostname, if assigned
    pub private_dns: Option<String>,
    /// Public DNS hostname, if assigned
    pub public_dns: Option<String>,
    /// Instance tags
    pub tags: HashMap<String, String>,
}

impl InstanceRecord {
    /// The address field selected by `kind`, if present and non-empty.
    ///
    /// An empty string is treated as absent: a discovery record entry
    /// pointing at nothing is worse than a loud failure.
    pub fn address(&self, kind: AddressKind) -> Option<&str> {
        let field = match kind {
            AddressKind::PrivateIp => self.private_ip.as_deref(),
            AddressKind::PublicIp => self.public_ip.as_deref(),
            AddressKind::PrivateDns => self.private_dns.as_deref(),
            AddressKind::PublicDns => self.public_dns.as_deref(),
        };
        field.filter(|value| !value.is_empty())
    }
}

/// The target DNS record for one run, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    /// Domain the record lives under (e.g. "etcd.local")
    pub domain: String,
    /// Transport port advertised in each SRV value
    pub port: u16,
    /// Record time-to-live in seconds
    pub ttl: i64,
    /// Whether peers speak TLS; selects the record name prefix
    pub ssl: bool,
}

impl RecordSpec {
    /// Canonical fully-qualified record name for this spec
    pub fn record_name(&self) -> String {
        if self.ssl {
            format!("{}.{}", SSL_RECORD_PREFIX, self.domain)
        } else {
            format!("{}.{}", RECORD_PREFIX, self.domain)
        }
    }

    /// URL scheme matching the TLS mode
    pub fn scheme(&self) -> &'static str {
        if self.ssl { "https" } else { "http" }
    }
}

/// A wire-level upsert request: replace the record set at `name` with
/// exactly `values`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    /// Fully-qualified record name
    pub name: String,
    /// Record time-to-live in seconds
    pub ttl: i64,
    /// SRV record values, one per peer, in membership order
    pub values: Vec<String>,
    /// Human-readable change comment
    pub comment: String,
}

impl RecordChange {
    /// Build the SRV change for a membership set.
    ///
    /// Priority and weight are always zero; weighted peer preference is not
    /// supported.
    pub fn srv(spec: &RecordSpec, members: &MembershipSet) -> Self {
        let values = members
            .iter()
            .map(|peer| format!("0 0 {} {}", spec.port, peer))
            .collect();
        Self {
            name: spec.record_name(),
            ttl: spec.ttl,
            values,
            comment: CHANGE_COMMENT.to_string(),
        }
    }
}

/// Tracking information for one submitted change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHandle {
    /// Provider-assigned change identifier
    pub id: String,
    /// Status reported at submission time
    pub state: ChangeState,
}

/// Propagation state of a submitted change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeState {
    /// The change has not yet propagated
    Pending,
    /// Any terminal state; the provider reports nothing more granular that
    /// this tool acts on
    Done,
}

/// Terminal outcome of one `sync_record` call.
///
/// There is no partial-success state: the provider's change API replaces
/// the record set wholesale or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// The change was accepted but confirmation polling was not requested
    Submitted {
        /// Provider-assigned change identifier
        change_id: String,
    },
    /// The change left the pending state while this tool was watching
    Confirmed {
        /// Provider-assigned change identifier
        change_id: String,
    },
}

impl SyncOutcome {
    /// The change identifier behind this outcome
    pub fn change_id(&self) -> &str {
        match self {
            SyncOutcome::Submitted { change_id } | SyncOutcome::Confirmed { change_id } => {
                change_id
            }
        }
    }

    /// Whether propagation was confirmed before returning
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SyncOutcome::Confirmed { .. })
    }
}
