//! Shared types for the reservation backend
//!
//! Plain data records, request/response DTOs and the slot key helpers used by
//! both the server and its HTTP clients.

pub mod models;
pub mod request;
pub mod response;
pub mod slot;

// Re-exports
pub use models::{Reservation, TableSlot};
pub use request::{AvailabilityQuery, ReservationCreate};
pub use response::{AvailabilityResponse, ErrorResponse, MessageResponse};
