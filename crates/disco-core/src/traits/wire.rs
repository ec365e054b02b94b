// # Wire Traits
//
// Contracts over the external cloud APIs, at exactly the boundary this
// tool consumes them. Concrete implementations (see the `disco-aws` crate)
// are untrusted edges with strict limitations:
//
// - Perform exactly one API call per invocation
// - Map provider responses into the types below
// - Return success or failure; the caller owns retry policy
//
// Implementations must NOT retry, sleep, cache responses, or make
// sequencing decisions. If a provider call fails, return an error and let
// the syncer or resolver decide what happens next. Keeping the edges
// single-shot is what makes the retry and polling tests in this crate
// meaningful.

use crate::error::Result;
use crate::types::{AddressKind, ChangeHandle, ChangeState, GroupRecord, InstanceRecord, RecordChange};
use async_trait::async_trait;

/// The group-management API: "describe group by name"
#[async_trait]
pub trait GroupApi: Send + Sync {
    /// All group records matching `name`, zero or more.
    ///
    /// The provider is expected to return at most one exact match for a
    /// unique name; callers treat anything else as a consistency error.
    async fn describe_group(&self, name: &str) -> Result<Vec<GroupRecord>>;
}

/// The instance inventory API: "describe instance by reference"
#[async_trait]
pub trait InstanceApi: Send + Sync {
    /// All inventory records for `instance_id`.
    ///
    /// A lookup by unique identifier should produce exactly one record;
    /// callers validate that and never guess among several.
    async fn describe_instance(&self, instance_id: &str) -> Result<Vec<InstanceRecord>>;
}

/// The local instance metadata endpoint, as flat key lookups
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// The calling instance's own unique identifier
    async fn instance_id(&self) -> Result<String>;

    /// The region the calling instance runs in
    async fn region(&self) -> Result<String>;

    /// The calling instance's own address of the given kind
    async fn address(&self, kind: AddressKind) -> Result<String>;
}

/// The managed DNS zone API: submit a change, read a change's status
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Submit one upsert change replacing the record set wholesale.
    ///
    /// Single-shot: no retry inside implementations; the syncer owns the
    /// retry policy.
    async fn submit_change(&self, change: &RecordChange) -> Result<ChangeHandle>;

    /// Current propagation state of a previously submitted change
    async fn change_status(&self, change_id: &str) -> Result<ChangeState>;

    /// Provider name for logging and error attribution
    fn provider_name(&self) -> &'static str;
}
