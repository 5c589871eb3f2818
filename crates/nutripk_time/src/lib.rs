//! Date/time normalization for NutriPK meal records.
//!
//! Meal timestamps arrive from persistence in several historical shapes:
//! ISO-8601 strings (with or without an offset), SQL-style naive datetimes,
//! `DD/MM/YYYY, HH:MM:SS` display strings, and bare epoch numbers. This crate
//! parses all of them into a `chrono::DateTime<Utc>` and projects that
//! instant into the app's fixed reference timezone (Asia/Karachi, UTC+5,
//! no DST) for calendar-day bucketing and display formatting.
//!
//! All parsing is fallible via `Option` and never panics: these functions
//! run inline in render paths where a panic would take down a screen.

use chrono::{DateTime, FixedOffset, Utc};

pub mod format;
pub mod parse;

pub use format::{
    add_days_iso, day_label, format_date, format_date_time, format_header_date, format_time,
    iso_date, iso_day, to_iso_date,
};
pub use parse::{parse_timestamp, parse_timestamp_value};

/// Offset of the reference timezone (Asia/Karachi, UTC+5, no DST) in seconds.
pub const PK_UTC_OFFSET_SECS: i32 = 5 * 3600;

/// The reference timezone as a `chrono` fixed offset.
pub fn pk_offset() -> FixedOffset {
    // UTC+5 is always within chrono's offset bounds.
    FixedOffset::east_opt(PK_UTC_OFFSET_SECS).expect("UTC+5 is a valid offset")
}

/// Project an instant into reference-local wall-clock time.
///
/// Correct across UTC day boundaries: `2025-01-01T20:00:00Z` maps to
/// reference-local `2025-01-02 01:00`.
pub fn to_pk_local(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&pk_offset())
}
