//! DNS record synchronization
//!
//! The syncer owns the full sync protocol on top of a single-shot
//! [`DnsApi`] edge:
//!
//! 1. Build one SRV value per peer (`"0 0 <port> <addr>"`) and submit one
//!    upsert replacing the record set wholesale.
//! 2. On submit failure, sleep a fixed backoff and retry exactly once; a
//!    second failure is fatal. No exponential backoff, no third attempt.
//! 3. Without confirmation: return as soon as the change is accepted.
//!    With confirmation: poll the change status, sleeping between polls
//!    while it stays pending; the first non-pending status confirms the
//!    change. A status-fetch error is fatal and not retried.
//!
//! State machine for one call:
//! `Submitting → {RetryOnce → Fatal | Submitted}`;
//! `Submitted → [wait] Polling → {Polling | Confirmed | Fatal}`;
//! `Submitted → [no wait] Unconfirmed (terminal)`.
//!
//! Polling is unbounded by default because DNS propagation has no fixed
//! upper bound, but an optional ceiling turns an unkillable wait into a
//! typed [`Error::ConfirmationTimeout`] the caller can act on.

use crate::error::{Error, Result};
use crate::traits::{DnsApi, RecordSync};
use crate::types::{ChangeState, MembershipSet, RecordChange, RecordSpec, SyncOutcome};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fixed backoff before the single submit retry
pub const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Fixed sleep between confirmation polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Synchronizes one DNS record set with a membership set
pub struct RecordSyncer {
    api: Box<dyn DnsApi>,
    retry_delay: Duration,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl RecordSyncer {
    /// Create a syncer with the default 10s backoff and poll interval and
    /// no confirmation ceiling
    pub fn new(api: Box<dyn DnsApi>) -> Self {
        Self::with_timing(api, RETRY_DELAY, POLL_INTERVAL, None)
    }

    /// Create a syncer with explicit timing, for callers that bound the
    /// confirmation wait (and for tests)
    pub fn with_timing(
        api: Box<dyn DnsApi>,
        retry_delay: Duration,
        poll_interval: Duration,
        max_wait: Option<Duration>,
    ) -> Self {
        Self {
            api,
            retry_delay,
            poll_interval,
            max_wait,
        }
    }

    async fn submit_with_retry(&self, change: &RecordChange) -> Result<crate::types::ChangeHandle> {
        match self.api.submit_change(change).await {
            Ok(handle) => Ok(handle),
            Err(first) => {
                // The one place a provider error is absorbed: logged, then
                // retried once after a fixed backoff. The retry's error is
                // the caller's problem.
                warn!(
                    provider = self.api.provider_name(),
                    error = %first,
                    "change submission failed, retrying in {}s",
                    self.retry_delay.as_secs()
                );
                tokio::time::sleep(self.retry_delay).await;
                self.api.submit_change(change).await
            }
        }
    }

    async fn wait_for_confirmation(&self, change_id: &str) -> Result<()> {
        let mut waited = Duration::ZERO;
        loop {
            let state = self.api.change_status(change_id).await?;
            debug!(change_id = %change_id, state = ?state, "polled change status");
            if !matches!(state, ChangeState::Pending) {
                return Ok(());
            }
            if let Some(max_wait) = self.max_wait
                && waited >= max_wait
            {
                return Err(Error::ConfirmationTimeout {
                    change_id: change_id.to_string(),
                    waited,
                });
            }
            debug!(
                change_id = %change_id,
                "change still pending, sleeping for {}s",
                self.poll_interval.as_secs()
            );
            tokio::time::sleep(self.poll_interval).await;
            waited += self.poll_interval;
        }
    }
}

#[async_trait]
impl RecordSync for RecordSyncer {
    async fn sync_record(
        &self,
        spec: &RecordSpec,
        members: &MembershipSet,
        wait: bool,
    ) -> Result<SyncOutcome> {
        let change = RecordChange::srv(spec, members);
        debug!(
            record = %change.name,
            values = change.values.len(),
            ttl = change.ttl,
            "submitting record change"
        );

        let handle = self.submit_with_retry(&change).await?;
        info!(change_id = %handle.id, "dns change submitted");

        if !wait {
            info!("not waiting for change confirmation");
            return Ok(SyncOutcome::Submitted {
                change_id: handle.id,
            });
        }

        info!(change_id = %handle.id, "waiting for change confirmation");
        self.wait_for_confirmation(&handle.id).await?;
        info!(change_id = %handle.id, "dns change confirmed");
        Ok(SyncOutcome::Confirmed {
            change_id: handle.id,
        })
    }
}
