// # disco-core
//
// Core library for disco, a one-shot reconciler that discovers the live
// members of an autoscaling group and syncs a DNS SRV service-discovery
// record to match, so that an etcd cluster can bootstrap by resolving a
// well-known name.
//
// ## Architecture Overview
//
// - **Wire traits** (`GroupApi`, `InstanceApi`, `MetadataApi`, `DnsApi`):
//   thin contracts over the external cloud APIs. Implementations live in
//   provider crates (see `disco-aws`) and execute exactly one API call per
//   invocation; all retry and sequencing policy is owned by this crate.
// - **IdentityResolver**: answers "what is my own address" and "which group
//   am I in" for a freshly launched instance with no other configuration.
// - **GroupMembership**: resolves a group name into the ordered list of
//   peer addresses, failing loudly on ambiguity or unreachable members.
// - **RecordSyncer**: replaces the SRV record set with exactly the current
//   membership, with a single fixed-backoff retry and an optional
//   confirmation poll loop.
// - **Pipeline**: wires the above into one reconciliation run.
//
// ## Design Principles
//
// 1. **Separation of Concerns**: reconciliation logic is separate from the
//    cloud wire calls, so the whole pipeline is testable with in-memory
//    doubles.
// 2. **Single-Shot Providers**: wire implementations never retry, never
//    sleep, never cache; the syncer owns the retry policy.
// 3. **No Ambient State**: configuration is an immutable struct built once
//    at startup; each run is stateless given its configuration.
// 4. **Fail Loudly**: a discovery record missing a live peer is a
//    correctness bug, so consistency errors are never guessed around.

pub mod config;
pub mod error;
pub mod identity;
pub mod membership;
pub mod pipeline;
pub mod syncer;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use identity::IdentityResolver;
pub use membership::GroupMembership;
pub use pipeline::{Pipeline, RunReport};
pub use syncer::RecordSyncer;
pub use traits::{DnsApi, GroupApi, InstanceApi, Membership, MetadataApi, RecordSync};
pub use types::{
    AddressKind, ChangeHandle, ChangeState, GroupRecord, InstanceRecord, MembershipSet,
    RecordChange, RecordSpec, SyncOutcome,
};
