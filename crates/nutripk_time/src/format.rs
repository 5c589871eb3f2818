//! Reference-local display formatting and ISO-date helpers.
//!
//! Formatting is done by hand from `Datelike`/`Timelike` fields so output is
//! stable regardless of platform locale. Everything returns `Option` on
//! unparseable input; callers render `None` as their own placeholder.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use serde_json::Value;

use crate::{parse_timestamp_value, to_pk_local};

const MONTHS_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAYS_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn month_abbr(month: u32) -> &'static str {
    MONTHS_ABBR[(month - 1) as usize]
}

fn twelve_hour(hour: u32) -> (u32, &'static str) {
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let h = hour % 12;
    (if h == 0 { 12 } else { h }, meridiem)
}

/// `h:mm AM/PM` in reference-local time, no leading zero on the hour.
pub fn format_time(raw: &Value) -> Option<String> {
    let local = to_pk_local(parse_timestamp_value(raw)?);
    let (hour, meridiem) = twelve_hour(local.hour());
    Some(format!("{}:{:02} {}", hour, local.minute(), meridiem))
}

/// `DD/MM/YYYY` in reference-local time.
pub fn format_date(raw: &Value) -> Option<String> {
    let local = to_pk_local(parse_timestamp_value(raw)?);
    Some(format!(
        "{:02}/{:02}/{:04}",
        local.day(),
        local.month(),
        local.year()
    ))
}

/// `Mon D, YYYY` header string. Absent or unparseable input falls back to
/// the current time, matching the legacy header behavior.
pub fn format_header_date(raw: Option<&Value>) -> String {
    let instant = raw.and_then(parse_timestamp_value).unwrap_or_else(Utc::now);
    let local = to_pk_local(instant);
    format!(
        "{} {}, {}",
        month_abbr(local.month()),
        local.day(),
        local.year()
    )
}

/// `D Mon YYYY, h:mm AM/PM` in reference-local time.
pub fn format_date_time(raw: &Value) -> Option<String> {
    let local = to_pk_local(parse_timestamp_value(raw)?);
    let (hour, meridiem) = twelve_hour(local.hour());
    Some(format!(
        "{} {} {}, {}:{:02} {}",
        local.day(),
        month_abbr(local.month()),
        local.year(),
        hour,
        local.minute(),
        meridiem
    ))
}

/// `YYYY-MM-DD` for a reference-local calendar date.
pub fn iso_day(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// The reference-local calendar day of an instant as `YYYY-MM-DD`.
///
/// Two instants map to the same string iff they fall on the same
/// reference-local calendar day, so this is the grouping key for buckets.
pub fn iso_date(instant: DateTime<Utc>) -> String {
    iso_day(to_pk_local(instant).date_naive())
}

/// [`iso_date`] over a raw timestamp value.
pub fn to_iso_date(raw: &Value) -> Option<String> {
    Some(iso_date(parse_timestamp_value(raw)?))
}

/// Add whole days to a `YYYY-MM-DD` date, rolling over month and year
/// boundaries. Negative deltas step backwards.
pub fn add_days_iso(iso: &str, delta: i64) -> Option<String> {
    let date = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d").ok()?;
    let shifted = date.checked_add_signed(Duration::try_days(delta)?)?;
    Some(iso_day(shifted))
}

/// `Mon 10 Mar` label for day buckets, the backend's `%a %d %b` convention.
pub fn day_label(date: NaiveDate) -> String {
    format!(
        "{} {:02} {}",
        WEEKDAYS_ABBR[date.weekday().num_days_from_monday() as usize],
        date.day(),
        month_abbr(date.month())
    )
}
