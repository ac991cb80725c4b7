//! ReservationLedger - table availability accounting
//!
//! Owns the slot and reservation collections. Every mutation runs inside a
//! single redb write transaction:
//!
//! ```text
//! create_reservation(req)
//!     ├─ 1. validate fields          → InvalidInput
//!     ├─ 2. begin write transaction  (serializes with other writers)
//!     ├─ 3. load slot                → SlotNotFound
//!     ├─ 4. slot already booked?     → DuplicateReservation
//!     ├─ 5. enough tables?           → InsufficientAvailability
//!     ├─ 6. decrement slot, store reservation
//!     └─ 7. commit
//! ```
//!
//! Any early return drops the transaction uncommitted, so failed requests
//! leave both collections untouched.

use shared::models::{Reservation, TableSlot};
use shared::request::ReservationCreate;
use shared::slot;

use super::error::{LedgerError, LedgerResult};
use super::storage::{LedgerStorage, StorageError};

/// Record counts reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub slots: u64,
    pub reservations: u64,
}

/// The reservation ledger
#[derive(Clone, Debug)]
pub struct ReservationLedger {
    storage: LedgerStorage,
}

impl ReservationLedger {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Create one slot per (date, time) pair with `capacity` free tables
    ///
    /// Pairs that already have a slot are left untouched, so re-running the
    /// seed against an existing database changes nothing. Returns the number
    /// of slots created.
    pub fn seed_slots(
        &self,
        dates: &[String],
        times: &[String],
        capacity: u32,
    ) -> LedgerResult<usize> {
        let txn = self.storage.begin_write()?;
        let mut created = 0;

        for date in dates {
            for time in times {
                if self.storage.get_slot_txn(&txn, date, time)?.is_some() {
                    continue;
                }
                let id = self.storage.next_slot_id(&txn)?;
                self.storage
                    .store_slot(&txn, &TableSlot::new(id, date.as_str(), time.as_str(), capacity))?;
                created += 1;
            }
        }

        txn.commit().map_err(StorageError::from)?;
        tracing::info!(created, capacity, "Table slots seeded");
        Ok(created)
    }

    /// All slots, ordered by ID
    pub fn list_slots(&self) -> LedgerResult<Vec<TableSlot>> {
        Ok(self.storage.get_all_slots()?)
    }

    /// Free tables for (date, time)
    pub fn get_availability(&self, date: Option<&str>, time: Option<&str>) -> LedgerResult<u32> {
        let date = slot::required(date, "data")?;
        let time = slot::required(time, "horario")?;

        let table_slot = self
            .storage
            .get_slot(date, time)?
            .ok_or(LedgerError::SlotNotFound)?;
        Ok(table_slot.num_disponiveis)
    }

    /// Book a slot
    pub fn create_reservation(&self, request: &ReservationCreate) -> LedgerResult<Reservation> {
        let (date, time, party_size) = validate_request(request)?;

        let txn = self.storage.begin_write()?;

        let mut table_slot = self
            .storage
            .get_slot_txn(&txn, date, time)?
            .ok_or(LedgerError::SlotNotFound)?;

        if let Some(existing) = self.storage.slot_reservation_txn(&txn, date, time)? {
            tracing::debug!(date, time, existing, "Slot already reserved");
            return Err(LedgerError::DuplicateReservation);
        }

        if !table_slot.can_seat(party_size) {
            tracing::debug!(
                date,
                time,
                party_size,
                available = table_slot.num_disponiveis,
                "Not enough tables"
            );
            return Err(LedgerError::InsufficientAvailability {
                requested: party_size,
                available: table_slot.num_disponiveis,
            });
        }

        // can_seat bounds party_size by a u32 count
        let party_size = u32::try_from(party_size).map_err(|_| {
            LedgerError::InvariantViolation(format!("party size {} out of range", party_size))
        })?;
        table_slot.num_disponiveis -= party_size;
        let reservation = Reservation {
            id: self.storage.next_reservation_id(&txn)?,
            data: date.to_string(),
            horario: time.to_string(),
            num_pessoas: party_size,
        };
        self.storage.store_slot(&txn, &table_slot)?;
        self.storage.store_reservation(&txn, &reservation)?;

        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            reservation_id = reservation.id,
            date,
            time,
            party_size,
            remaining = table_slot.num_disponiveis,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Cancel a reservation and give its tables back to the slot
    ///
    /// Returns the removed reservation.
    pub fn cancel_reservation(&self, reservation_id: i64) -> LedgerResult<Reservation> {
        tracing::info!(reservation_id, "Cancelling reservation");

        let txn = self.storage.begin_write()?;

        let reservation = self
            .storage
            .get_reservation_txn(&txn, reservation_id)?
            .ok_or(LedgerError::ReservationNotFound(reservation_id))?;

        let mut table_slot = self
            .storage
            .get_slot_txn(&txn, &reservation.data, &reservation.horario)?
            .ok_or_else(|| {
                tracing::error!(
                    reservation_id,
                    date = %reservation.data,
                    time = %reservation.horario,
                    "Reservation references a missing slot"
                );
                LedgerError::InvariantViolation(format!(
                    "no slot for reservation {} ({} {})",
                    reservation_id, reservation.data, reservation.horario
                ))
            })?;

        table_slot.num_disponiveis = table_slot
            .num_disponiveis
            .checked_add(reservation.num_pessoas)
            .ok_or_else(|| {
                LedgerError::InvariantViolation(format!(
                    "capacity overflow releasing reservation {}",
                    reservation_id
                ))
            })?;

        self.storage.store_slot(&txn, &table_slot)?;
        self.storage.remove_reservation(&txn, &reservation)?;

        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            reservation_id,
            date = %reservation.data,
            time = %reservation.horario,
            released = reservation.num_pessoas,
            available = table_slot.num_disponiveis,
            "Reservation cancelled"
        );
        Ok(reservation)
    }

    /// All reservations, ordered by ID
    pub fn list_reservations(&self) -> LedgerResult<Vec<Reservation>> {
        Ok(self.storage.get_all_reservations()?)
    }

    pub fn stats(&self) -> LedgerResult<LedgerStats> {
        Ok(LedgerStats {
            slots: self.storage.slot_count()?,
            reservations: self.storage.reservation_count()?,
        })
    }
}

/// Check presence of every field, then the party size
fn validate_request(request: &ReservationCreate) -> LedgerResult<(&str, &str, i64)> {
    let date = slot::required(request.data.as_deref(), "data")?;
    let time = slot::required(request.horario.as_deref(), "horario")?;
    let party_size = request
        .num_pessoas
        .ok_or_else(|| LedgerError::invalid_input("num_pessoas is required"))?;

    if party_size <= 0 {
        return Err(LedgerError::invalid_input(
            "num_pessoas must be a positive integer",
        ));
    }
    Ok((date, time, party_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "27/07/2023";
    const TIME: &str = "11:00";

    fn create_test_ledger() -> ReservationLedger {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let ledger = ReservationLedger::new(storage);
        let dates = vec![DATE.to_string(), "28/07/2023".to_string()];
        let times = vec![TIME.to_string(), "12:00".to_string()];
        ledger.seed_slots(&dates, &times, 10).unwrap();
        ledger
    }

    fn availability(ledger: &ReservationLedger, date: &str, time: &str) -> u32 {
        ledger.get_availability(Some(date), Some(time)).unwrap()
    }

    #[test]
    fn test_seed_creates_cartesian_product() {
        let ledger = create_test_ledger();
        let slots = ledger.list_slots().unwrap();
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.num_disponiveis == 10));

        let ids: Vec<i64> = slots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let ledger = create_test_ledger();
        ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 3))
            .unwrap();

        let created = ledger
            .seed_slots(&[DATE.to_string()], &[TIME.to_string()], 10)
            .unwrap();
        assert_eq!(created, 0);
        assert_eq!(ledger.list_slots().unwrap().len(), 4);
        assert_eq!(availability(&ledger, DATE, TIME), 7);
    }

    #[test]
    fn test_create_reservation_decrements_availability() {
        let ledger = create_test_ledger();

        let reservation = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 4))
            .unwrap();

        assert_eq!(reservation.num_pessoas, 4);
        assert_eq!(reservation.data, DATE);
        assert_eq!(reservation.horario, TIME);
        assert_eq!(availability(&ledger, DATE, TIME), 6);
        assert_eq!(ledger.list_reservations().unwrap(), vec![reservation]);
    }

    #[test]
    fn test_second_reservation_for_slot_is_conflict() {
        let ledger = create_test_ledger();
        ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 4))
            .unwrap();

        let err = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 2))
            .unwrap_err();

        assert!(matches!(err, LedgerError::DuplicateReservation));
        assert_eq!(availability(&ledger, DATE, TIME), 6);
        assert_eq!(ledger.list_reservations().unwrap().len(), 1);
    }

    #[test]
    fn test_insufficient_availability() {
        let ledger = create_test_ledger();

        let err = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 11))
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientAvailability {
                requested: 11,
                available: 10
            }
        ));
        assert_eq!(availability(&ledger, DATE, TIME), 10);
        assert!(ledger.list_reservations().unwrap().is_empty());
    }

    #[test]
    fn test_oversized_party_is_insufficient_availability() {
        let ledger = create_test_ledger();

        let err = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, i64::MAX))
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientAvailability {
                requested: i64::MAX,
                available: 10
            }
        ));
        assert_eq!(availability(&ledger, DATE, TIME), 10);
        assert!(ledger.list_reservations().unwrap().is_empty());
    }

    #[test]
    fn test_oversized_party_still_reports_duplicate_first() {
        let ledger = create_test_ledger();
        ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 2))
            .unwrap();

        let err = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 5_000_000_000))
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateReservation));
    }

    #[test]
    fn test_whole_slot_can_be_booked() {
        let ledger = create_test_ledger();
        ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 10))
            .unwrap();
        assert_eq!(availability(&ledger, DATE, TIME), 0);
    }

    #[test]
    fn test_unknown_slot() {
        let ledger = create_test_ledger();

        let err = ledger
            .create_reservation(&ReservationCreate::new("01/01/2030", TIME, 2))
            .unwrap_err();
        assert!(matches!(err, LedgerError::SlotNotFound));

        let err = ledger.get_availability(Some(DATE), Some("23:00")).unwrap_err();
        assert!(matches!(err, LedgerError::SlotNotFound));
        assert!(ledger.list_reservations().unwrap().is_empty());
    }

    #[test]
    fn test_missing_fields_are_invalid_input() {
        let ledger = create_test_ledger();

        let missing_party = ReservationCreate {
            num_pessoas: None,
            ..ReservationCreate::new(DATE, TIME, 1)
        };
        let missing_date = ReservationCreate {
            data: None,
            ..ReservationCreate::new(DATE, TIME, 1)
        };
        let blank_time = ReservationCreate {
            horario: Some(String::new()),
            ..ReservationCreate::new(DATE, TIME, 1)
        };

        for request in [missing_party, missing_date, blank_time] {
            let err = ledger.create_reservation(&request).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)), "{request:?}");
        }

        let err = ledger.get_availability(None, Some(TIME)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_fields_checked_before_slot_lookup() {
        let ledger = create_test_ledger();
        let request = ReservationCreate {
            num_pessoas: None,
            ..ReservationCreate::new("01/01/2030", TIME, 1)
        };
        let err = ledger.create_reservation(&request).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn test_non_positive_party_size() {
        let ledger = create_test_ledger();

        for size in [0, -3] {
            let err = ledger
                .create_reservation(&ReservationCreate::new(DATE, TIME, size))
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)));
        }
        assert_eq!(availability(&ledger, DATE, TIME), 10);
    }

    #[test]
    fn test_cancel_restores_availability() {
        let ledger = create_test_ledger();
        let reservation = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 4))
            .unwrap();

        let cancelled = ledger.cancel_reservation(reservation.id).unwrap();

        assert_eq!(cancelled, reservation);
        assert_eq!(availability(&ledger, DATE, TIME), 10);
        assert!(ledger.list_reservations().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_then_rebook_round_trip() {
        let ledger = create_test_ledger();
        let first = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 5))
            .unwrap();
        ledger.cancel_reservation(first.id).unwrap();

        let second = ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 5))
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(availability(&ledger, DATE, TIME), 5);
    }

    #[test]
    fn test_cancel_unknown_reservation() {
        let ledger = create_test_ledger();
        let err = ledger.cancel_reservation(999).unwrap_err();
        assert!(matches!(err, LedgerError::ReservationNotFound(999)));
    }

    #[test]
    fn test_cancel_with_missing_slot_is_invariant_violation() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let orphan = Reservation {
            id: 1,
            data: DATE.to_string(),
            horario: TIME.to_string(),
            num_pessoas: 2,
        };
        let txn = storage.begin_write().unwrap();
        storage.store_reservation(&txn, &orphan).unwrap();
        txn.commit().unwrap();

        let ledger = ReservationLedger::new(storage);
        let err = ledger.cancel_reservation(1).unwrap_err();

        assert!(matches!(err, LedgerError::InvariantViolation(_)));
        assert_eq!(ledger.list_reservations().unwrap(), vec![orphan]);
    }

    #[test]
    fn test_stats() {
        let ledger = create_test_ledger();
        ledger
            .create_reservation(&ReservationCreate::new(DATE, TIME, 1))
            .unwrap();
        assert_eq!(
            ledger.stats().unwrap(),
            LedgerStats {
                slots: 4,
                reservations: 1
            }
        );
    }
}
