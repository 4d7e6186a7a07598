//! Canonical calendar-day handling
//!
//! Every "day" in the engine is a `chrono::NaiveDate` resolved against a
//! single fixed day boundary: UTC midnight. Resolving "today" through the
//! device's local zone would let a habit's current day shift mid-session
//! when the device crosses a timezone or DST boundary, so local time is
//! never consulted anywhere in the engine.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::StoreError;

/// Canonical string form of a calendar day (`2024-01-07`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// The current calendar day at the UTC day boundary.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Truncate a timestamp to its UTC calendar day.
pub fn day_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Parse a canonical `YYYY-MM-DD` string.
///
/// Only the exact canonical form is accepted; anything else is a
/// `StoreError::DateParseError`.
pub fn parse_day(value: &str) -> Result<NaiveDate, StoreError> {
    let parsed = NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|_| StoreError::DateParseError(value.to_string()))?;
    // chrono tolerates leading whitespace and unpadded fields; persisted
    // keys and API inputs must be the exact canonical rendering.
    if format_day(parsed) != value {
        return Err(StoreError::DateParseError(value.to_string()));
    }
    Ok(parsed)
}

/// Format a calendar day in its canonical string form.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
