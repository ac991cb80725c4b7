//! Reservation Model

use serde::{Deserialize, Serialize};

/// A booking against the table slot sharing its (date, time)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub data: String,
    pub horario: String,
    /// Table-units consumed from the slot
    pub num_pessoas: u32,
}
