//! Core traits for the disco reconciler
//!
//! Two layers of seams:
//!
//! - [`Membership`] and [`RecordSync`] are the pipeline-facing abstractions
//!   ("give me the peers for a group", "make the record set match these
//!   peers"); the orchestrator depends on nothing more specific.
//! - The wire traits ([`GroupApi`], [`InstanceApi`], [`MetadataApi`],
//!   [`DnsApi`]) cover the external cloud APIs at their interface boundary,
//!   so the reconciliation logic in this crate is testable without any
//!   cloud credentials.

pub mod membership;
pub mod record_sync;
pub mod wire;

pub use membership::Membership;
pub use record_sync::RecordSync;
pub use wire::{DnsApi, GroupApi, InstanceApi, MetadataApi};
