//! Table Slot Model

use serde::{Deserialize, Serialize};

/// Tables still free for one (date, time) seating period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSlot {
    pub id: i64,
    /// Date, `DD/MM/YYYY`
    pub data: String,
    /// Time, `HH:MM`
    pub horario: String,
    /// Remaining bookable table-units
    pub num_disponiveis: u32,
}

impl TableSlot {
    pub fn new(id: i64, date: impl Into<String>, time: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            data: date.into(),
            horario: time.into(),
            num_disponiveis: capacity,
        }
    }

    /// Whether `party_size` table-units can still be taken from this slot
    pub fn can_seat(&self, party_size: i64) -> bool {
        i64::from(self.num_disponiveis) >= party_size
    }
}
