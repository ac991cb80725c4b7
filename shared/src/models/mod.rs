//! Data models
//!
//! Field names follow the public JSON contract (`data`, `horario`, ...),
//! so the records serialize as-is at the HTTP boundary.
//! All IDs are `i64`.

pub mod reservation;
pub mod table_slot;

// Re-exports
pub use reservation::*;
pub use table_slot::*;
