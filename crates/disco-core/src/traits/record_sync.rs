// # Record Sync Trait
//
// Defines the interface for replacing a DNS record set with exactly the
// given peer addresses.

use crate::error::Result;
use crate::types::{MembershipSet, RecordSpec, SyncOutcome};
use async_trait::async_trait;

/// Trait for DNS record synchronization
///
/// The upsert is atomic at the provider boundary: the record set is
/// replaced wholesale or not at all, so there is no partial-success
/// outcome and repeated calls with the same membership are idempotent.
#[async_trait]
pub trait RecordSync: Send + Sync {
    /// Replace the record set described by `spec` with exactly `members`.
    ///
    /// When `wait` is false, returns [`SyncOutcome::Submitted`] as soon as
    /// the change is accepted; when true, polls the provider until the
    /// change leaves the pending state and returns
    /// [`SyncOutcome::Confirmed`].
    async fn sync_record(
        &self,
        spec: &RecordSpec,
        members: &MembershipSet,
        wait: bool,
    ) -> Result<SyncOutcome>;
}
