//! Ledger error types

use thiserror::Error;

use super::storage::StorageError;

/// Errors returned by [`ReservationLedger`](super::ReservationLedger) operations
///
/// A failed operation never leaves partial writes behind: the write
/// transaction is dropped without commit.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing or malformed request field
    #[error("{0}")]
    InvalidInput(String),

    /// No slot exists for the requested (date, time)
    #[error("invalid date or time")]
    SlotNotFound,

    #[error("reservation {0} not found")]
    ReservationNotFound(i64),

    /// The slot already holds a reservation
    #[error("reservation already exists for this date/time")]
    DuplicateReservation,

    #[error("insufficient availability: requested {requested}, available {available}")]
    InsufficientAvailability { requested: i64, available: u32 },

    /// Stored records disagree with each other
    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<shared::slot::SlotKeyError> for LedgerError {
    fn from(e: shared::slot::SlotKeyError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
