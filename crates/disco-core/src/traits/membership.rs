// # Membership Trait
//
// Defines the interface for resolving a named group into the current list
// of network-addressable peers.
//
// ## Implementations
//
// - `GroupMembership` in this crate, over the wire-level inventory traits
// - Test doubles in the contract test suites

use crate::error::Result;
use crate::types::{AddressKind, MembershipSet};
use async_trait::async_trait;

/// Trait for membership resolution
///
/// One call resolves one group name into one point-in-time membership set.
/// Implementations hold no cross-call mutable state and perform no retries;
/// transient provider errors propagate to the caller, which owns retry
/// policy.
#[async_trait]
pub trait Membership: Send + Sync {
    /// Resolve the current members of `group`, addressed by `kind`.
    ///
    /// The returned set preserves the order the inventory API produced; it
    /// is neither deduplicated nor sorted.
    ///
    /// # Errors
    ///
    /// - `GroupNotFound` / `AmbiguousGroup` when the group query returns
    ///   anything other than exactly one record
    /// - `Inventory` when any member lookup fails or a member lacks the
    ///   requested address field; one unreachable member fails the whole
    ///   call rather than being silently dropped
    async fn members(&self, group: &str, kind: AddressKind) -> Result<MembershipSet>;
}
