//! Reservation ledger
//!
//! # Structure
//!
//! - [`storage`] - redb tables for slots and reservations
//! - [`manager`] - [`ReservationLedger`] business rules
//! - [`error`] - [`LedgerError`]

pub mod error;
pub mod manager;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
pub use manager::{LedgerStats, ReservationLedger};
pub use storage::{LedgerStorage, StorageError, StorageResult};
