//! redb-based storage layer for the reservation ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `table_slots` | `(date, time)` | `TableSlot` | One row per seating period |
//! | `reservations` | `reservation_id` | `Reservation` | Bookings |
//! | `slot_reservations` | `(date, time)` | `reservation_id` | Booking index per slot |
//! | `sequence_counter` | `&str` | `i64` | ID counters |
//!
//! # Atomicity
//!
//! redb allows a single write transaction at a time. Every ledger mutation
//! performs its checks and writes inside one `WriteTransaction`, so the
//! check-then-decrement sequence is serialized and a transaction dropped
//! without `commit()` leaves nothing behind.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::models::{Reservation, TableSlot};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for slots: key = (date, time), value = JSON-serialized TableSlot
const SLOTS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("table_slots");

/// Table for reservations: key = reservation id, value = JSON-serialized Reservation
const RESERVATIONS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("reservations");

/// Index of the reservation holding each slot: key = (date, time), value = reservation id
const SLOT_RESERVATIONS_TABLE: TableDefinition<(&str, &str), i64> =
    TableDefinition::new("slot_reservations");

/// Table for ID counters: key = counter name, value = last issued ID
const SEQUENCE_TABLE: TableDefinition<&str, i64> = TableDefinition::new("sequence_counter");

const SLOT_ID_KEY: &str = "slot_id";
const RESERVATION_ID_KEY: &str = "reservation_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Ledger storage backed by redb
#[derive(Clone)]
pub struct LedgerStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for LedgerStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStorage").finish_non_exhaustive()
    }
}

impl LedgerStorage {
    /// Open or create the database at the given path
    ///
    /// Commits are durable once `commit()` returns (redb's default
    /// `Durability::Immediate`).
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn init_tables(db: &Database) -> StorageResult<()> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SLOTS_TABLE)?;
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(SLOT_RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(SEQUENCE_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    ///
    /// Blocks while another write transaction is open.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Increment and return the named counter (within transaction)
    fn next_id(&self, txn: &WriteTransaction, key: &str) -> StorageResult<i64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    /// Allocate the next slot ID (within transaction)
    pub fn next_slot_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        self.next_id(txn, SLOT_ID_KEY)
    }

    /// Allocate the next reservation ID (within transaction)
    pub fn next_reservation_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        self.next_id(txn, RESERVATION_ID_KEY)
    }

    // ========== Slot Operations ==========

    /// Get a slot by (date, time)
    pub fn get_slot(&self, date: &str, time: &str) -> StorageResult<Option<TableSlot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;

        match table.get((date, time))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a slot by (date, time) (within transaction)
    pub fn get_slot_txn(
        &self,
        txn: &WriteTransaction,
        date: &str,
        time: &str,
    ) -> StorageResult<Option<TableSlot>> {
        let table = txn.open_table(SLOTS_TABLE)?;

        match table.get((date, time))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or overwrite a slot (within transaction)
    pub fn store_slot(&self, txn: &WriteTransaction, slot: &TableSlot) -> StorageResult<()> {
        let mut table = txn.open_table(SLOTS_TABLE)?;
        let value = serde_json::to_vec(slot)?;
        table.insert((slot.data.as_str(), slot.horario.as_str()), value.as_slice())?;
        Ok(())
    }

    /// Get all slots
    pub fn get_all_slots(&self) -> StorageResult<Vec<TableSlot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;

        let mut slots = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let slot: TableSlot = serde_json::from_slice(value.value())?;
            slots.push(slot);
        }

        slots.sort_by_key(|s| s.id);
        Ok(slots)
    }

    /// Number of stored slots
    pub fn slot_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;
        Ok(table.len()?)
    }

    // ========== Reservation Operations ==========

    /// Get a reservation by ID (within transaction)
    pub fn get_reservation_txn(
        &self,
        txn: &WriteTransaction,
        reservation_id: i64,
    ) -> StorageResult<Option<Reservation>> {
        let table = txn.open_table(RESERVATIONS_TABLE)?;

        match table.get(reservation_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get the ID of the reservation holding (date, time), if any (within transaction)
    pub fn slot_reservation_txn(
        &self,
        txn: &WriteTransaction,
        date: &str,
        time: &str,
    ) -> StorageResult<Option<i64>> {
        let table = txn.open_table(SLOT_RESERVATIONS_TABLE)?;
        Ok(table.get((date, time))?.map(|guard| guard.value()))
    }

    /// Store a reservation and index it under its slot (within transaction)
    pub fn store_reservation(
        &self,
        txn: &WriteTransaction,
        reservation: &Reservation,
    ) -> StorageResult<()> {
        let value = serde_json::to_vec(reservation)?;
        {
            let mut table = txn.open_table(RESERVATIONS_TABLE)?;
            table.insert(reservation.id, value.as_slice())?;
        }
        let mut index = txn.open_table(SLOT_RESERVATIONS_TABLE)?;
        index.insert(
            (reservation.data.as_str(), reservation.horario.as_str()),
            reservation.id,
        )?;
        Ok(())
    }

    /// Remove a reservation and its slot index entry (within transaction)
    pub fn remove_reservation(
        &self,
        txn: &WriteTransaction,
        reservation: &Reservation,
    ) -> StorageResult<()> {
        {
            let mut table = txn.open_table(RESERVATIONS_TABLE)?;
            table.remove(reservation.id)?;
        }
        let mut index = txn.open_table(SLOT_RESERVATIONS_TABLE)?;
        index.remove((reservation.data.as_str(), reservation.horario.as_str()))?;
        Ok(())
    }

    /// Get all reservations
    pub fn get_all_reservations(&self) -> StorageResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;

        let mut reservations = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let reservation: Reservation = serde_json::from_slice(value.value())?;
            reservations.push(reservation);
        }

        Ok(reservations)
    }

    /// Number of stored reservations
    pub fn reservation_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        Ok(table.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_reservation(id: i64, date: &str, time: &str) -> Reservation {
        Reservation {
            id,
            data: date.to_string(),
            horario: time.to_string(),
            num_pessoas: 2,
        }
    }

    #[test]
    fn test_id_counters_are_independent() {
        let storage = LedgerStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_slot_id(&txn).unwrap(), 1);
        assert_eq!(storage.next_slot_id(&txn).unwrap(), 2);
        assert_eq!(storage.next_reservation_id(&txn).unwrap(), 1);
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_reservation_id(&txn).unwrap(), 2);
        txn.commit().unwrap();
    }

    #[test]
    fn test_slot_storage() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let slot = TableSlot::new(1, "27/07/2023", "11:00", 10);

        let txn = storage.begin_write().unwrap();
        storage.store_slot(&txn, &slot).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_slot("27/07/2023", "11:00").unwrap(), Some(slot));
        assert_eq!(storage.get_slot("27/07/2023", "12:00").unwrap(), None);
        assert_eq!(storage.slot_count().unwrap(), 1);
    }

    #[test]
    fn test_reservation_index() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let reservation = create_test_reservation(5, "28/07/2023", "19:00");

        let txn = storage.begin_write().unwrap();
        storage.store_reservation(&txn, &reservation).unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(
            storage.slot_reservation_txn(&txn, "28/07/2023", "19:00").unwrap(),
            Some(5)
        );
        assert_eq!(
            storage.get_reservation_txn(&txn, 5).unwrap(),
            Some(reservation.clone())
        );
        storage.remove_reservation(&txn, &reservation).unwrap();
        assert_eq!(
            storage.slot_reservation_txn(&txn, "28/07/2023", "19:00").unwrap(),
            None
        );
        txn.commit().unwrap();

        assert!(storage.get_all_reservations().unwrap().is_empty());
    }

    #[test]
    fn test_uncommitted_transaction_is_discarded() {
        let storage = LedgerStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .store_reservation(&txn, &create_test_reservation(1, "27/07/2023", "11:00"))
            .unwrap();
        drop(txn);

        assert_eq!(storage.reservation_count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.redb");

        {
            let storage = LedgerStorage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            storage
                .store_slot(&txn, &TableSlot::new(1, "27/07/2023", "11:00", 10))
                .unwrap();
            txn.commit().unwrap();
        }

        let storage = LedgerStorage::open(&path).unwrap();
        assert_eq!(storage.get_all_slots().unwrap().len(), 1);
    }
}
