//! Configuration for one reconciliation run
//!
//! All configuration is gathered once at startup into an immutable
//! [`Config`] and passed by reference into each component; no component
//! reads ambient global state. Every configuration error is detected by
//! [`Config::validate`] before any network call is made.

use crate::error::{Error, Result};
use crate::types::{AddressKind, RecordSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default domain the discovery record lives under
pub const DEFAULT_DOMAIN: &str = "etcd.local";

/// Default transport port advertised in SRV values
pub const DEFAULT_PORT: u16 = 2380;

/// Default record time-to-live in seconds
pub const DEFAULT_TTL: i64 = 60;

/// Default path of the etcd environment file written after a run
pub const DEFAULT_OUTPUT_FILE: &str = "/etc/disco/etcd-discovery";

/// Configuration for one reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hosted zone identifier the record is managed in
    pub zone_id: String,

    /// Domain the discovery record lives under
    pub domain: String,

    /// Whether peers speak TLS (selects record name and URL scheme)
    pub ssl: bool,

    /// Transport port advertised in each SRV value
    pub port: u16,

    /// Record time-to-live in seconds; must be positive
    pub ttl: i64,

    /// Whether to poll until the change leaves the pending state
    pub wait: bool,

    /// Optional ceiling on the confirmation wait, in seconds.
    ///
    /// Unset means wait indefinitely; DNS propagation has no fixed upper
    /// bound.
    pub max_wait_secs: Option<u64>,

    /// Provider region; empty triggers metadata self-discovery
    pub region: Option<String>,

    /// Group name; empty triggers self-discovery via instance tags
    pub group: Option<String>,

    /// Which inventory field to publish for each peer
    pub address_kind: AddressKind,

    /// Where to write the etcd environment file
    pub file: PathBuf,
}

impl Config {
    /// Validate the configuration.
    ///
    /// Must be called before any component touches the network.
    pub fn validate(&self) -> Result<()> {
        if self.zone_id.is_empty() {
            return Err(Error::config("zone id is required"));
        }
        if self.domain.is_empty() {
            return Err(Error::config("domain is required"));
        }
        if self.port == 0 {
            return Err(Error::config("port must be > 0"));
        }
        if self.ttl <= 0 {
            return Err(Error::config("ttl must be > 0"));
        }
        if self.max_wait_secs == Some(0) {
            return Err(Error::config("max wait must be > 0 seconds when set"));
        }
        if matches!(&self.group, Some(group) if group.is_empty()) {
            return Err(Error::config("group name cannot be empty when set"));
        }
        Ok(())
    }

    /// The DNS record spec derived from this configuration
    pub fn record_spec(&self) -> RecordSpec {
        RecordSpec {
            domain: self.domain.clone(),
            port: self.port,
            ttl: self.ttl,
            ssl: self.ssl,
        }
    }

    /// The confirmation wait ceiling as a duration, if configured
    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_secs.map(Duration::from_secs)
    }
}
