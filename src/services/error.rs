//! Error types for the availability pipeline.

use crate::models::EventId;
use crate::store::StoreError;

/// Result type for availability services.
pub type AvailabilityResult<T> = Result<T, AvailabilityError>;

/// Error type for the enrich/aggregate pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    /// A mandatory per-record attribute lookup did not resolve to exactly
    /// one value. Completeness events are guaranteed to carry one value per
    /// tracked attribute, so this aborts the whole request rather than
    /// attempting partial recovery.
    #[error(
        "data integrity fault on event {event}: attribute '{attribute}' resolved to {found} values, expected exactly 1"
    )]
    DataIntegrity {
        event: EventId,
        attribute: &'static str,
        found: usize,
    },

    /// A requested event does not exist (e.g. the datatake view was asked
    /// for an unknown planned imaging UUID).
    #[error("event {0} not found")]
    EventNotFound(EventId),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
