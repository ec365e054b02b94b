//! Error types for the disco reconciler
//!
//! The taxonomy follows the failure model of one reconciliation run:
//! configuration errors are detected before any network call, provider
//! errors propagate without local recovery (except the single documented
//! retry at the DNS-submit step), and consistency errors are never guessed
//! or defaulted.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for disco operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the disco reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing required field, invalid value)
    #[error("configuration error: {0}")]
    Config(String),

    /// The local instance metadata service could not be reached or did not
    /// expose the requested field
    #[error("metadata service error: {0}")]
    Metadata(String),

    /// The local instance identity could not be established
    #[error("identity lookup failed: {0}")]
    Identity(String),

    /// The instance inventory API errored or returned an unexpected shape
    #[error("inventory lookup failed: {0}")]
    Inventory(String),

    /// The group-management API returned no group for the given name
    #[error("no autoscaling group named {0:?}")]
    GroupNotFound(String),

    /// The group-management API returned more than one group where exactly
    /// one exact match was expected
    #[error("expected one autoscaling group named {name:?}, provider returned {count}")]
    AmbiguousGroup {
        /// The queried group name
        name: String,
        /// How many groups the provider returned
        count: usize,
    },

    /// No group-membership tag was found on the local instance
    #[error("no autoscaling group tag found on this instance")]
    GroupTagMissing,

    /// A cloud provider API call failed
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// The confirmation wait ceiling was exceeded while the change was
    /// still pending
    #[error("change {change_id} still pending after {}s", waited.as_secs())]
    ConfirmationTimeout {
        /// The provider-assigned change identifier
        change_id: String,
        /// How long the syncer waited before giving up
        waited: Duration,
    },

    /// I/O errors (e.g. writing the output environment file)
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a metadata service error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create an identity lookup error
    pub fn identity(msg: impl Into<String>) -> Self {
        Self::Identity(msg.into())
    }

    /// Create an inventory lookup error
    pub fn inventory(msg: impl Into<String>) -> Self {
        Self::Inventory(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error was detected before any network call was made
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
