//! Slot key helpers
//!
//! A slot is addressed by its date (`DD/MM/YYYY`) and time (`HH:MM`, 24h).
//! Keys are compared as exact strings, so seed values must use the fixed
//! zero-padded format.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H:%M";

const DATE_LEN: usize = 10;
const TIME_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotKeyError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid date '{0}', expected DD/MM/YYYY")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Return the value when present and not blank
pub fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, SlotKeyError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SlotKeyError::Missing(field)),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, SlotKeyError> {
    if value.len() != DATE_LEN {
        return Err(SlotKeyError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| SlotKeyError::InvalidDate(value.to_string()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, SlotKeyError> {
    if value.len() != TIME_LEN {
        return Err(SlotKeyError::InvalidTime(value.to_string()));
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| SlotKeyError::InvalidTime(value.to_string()))
}
