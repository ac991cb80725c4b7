//! Request types
//!
//! Every field is optional on the wire: a missing field is a validation
//! failure reported by the ledger, not a deserialization failure.

use serde::{Deserialize, Serialize};

/// POST /reservas body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCreate {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub horario: Option<String>,
    #[serde(default)]
    pub num_pessoas: Option<i64>,
}

impl ReservationCreate {
    pub fn new(date: impl Into<String>, time: impl Into<String>, party_size: i64) -> Self {
        Self {
            data: Some(date.into()),
            horario: Some(time.into()),
            num_pessoas: Some(party_size),
        }
    }
}

/// GET /mesas_disponiveis query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub horario: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let req: ReservationCreate =
            serde_json::from_str(r#"{"data": "27/07/2023", "horario": "11:00"}"#).unwrap();
        assert_eq!(req.data.as_deref(), Some("27/07/2023"));
        assert_eq!(req.num_pessoas, None);
    }

    #[test]
    fn test_empty_object_deserializes() {
        let req: ReservationCreate = serde_json::from_str("{}").unwrap();
        assert_eq!(req, ReservationCreate::default());
    }
}
