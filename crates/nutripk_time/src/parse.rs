//! Ordered timestamp-shape parsers.
//!
//! Every shape observed in stored meal rows has a dedicated parser;
//! `parse_timestamp` tries them in a fixed priority order and returns the
//! first success. Unrecognized input yields `None` rather than a wrong date.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;

use crate::pk_offset;

static DIGITS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static OFFSET_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]\d{2}:?\d{2}$").expect("valid regex"));
static SQL_NAIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}(:\d{2}(\.\d+)?)?$").expect("valid regex")
});

/// Parse a raw timestamp string into an instant.
///
/// Shapes are tried in priority order:
/// 1. pure-digit epoch (more than 12 digits means milliseconds, else seconds)
/// 2. ISO-8601 (`T` separator); naive ISO is read as UTC
/// 3. `YYYY-MM-DD HH:MM[:SS[.ffffff]]` (space separator), read as UTC
/// 4. `DD/MM/YYYY[, HH:MM[:SS][ AM|PM]]`, read as **reference-local** time
/// 5. generic fallback: RFC 2822, then bare `YYYY-MM-DD` as UTC midnight
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if DIGITS_ONLY.is_match(s)
        && let Some(dt) = parse_epoch(s)
    {
        return Some(dt);
    }
    if s.contains('T')
        && let Some(dt) = parse_iso(s)
    {
        return Some(dt);
    }
    if SQL_NAIVE.is_match(s)
        && let Some(dt) = parse_sql_naive(s)
    {
        return Some(dt);
    }
    if s.contains('/')
        && let Some(dt) = parse_slash_local(s)
    {
        return Some(dt);
    }
    parse_fallback(s)
}

/// Parse a raw timestamp as it appears inside a JSON meal record.
///
/// Strings go through [`parse_timestamp`]; integers are epoch values
/// disambiguated by digit count. Anything else (floats, objects, null) is
/// unparseable.
pub fn parse_timestamp_value(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => {
            let n = n.as_i64()?;
            if n < 0 {
                return None;
            }
            // 13+ decimal digits cannot be a sane seconds value
            if n > 999_999_999_999 {
                DateTime::from_timestamp_millis(n)
            } else {
                DateTime::from_timestamp(n, 0)
            }
        }
        _ => None,
    }
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    let n: i64 = s.parse().ok()?;
    if s.len() > 12 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = s.strip_suffix(['Z', 'z']) {
        return parse_naive_iso(naive).map(|ndt| Utc.from_utc_datetime(&ndt));
    }
    if OFFSET_SUFFIX.is_match(s) {
        // offsets without a colon are not RFC 3339 but do show up in old rows
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(dt.with_timezone(&Utc));
        }
        return None;
    }
    // naive ISO is deliberately read as UTC, never ambient local time
    parse_naive_iso(s).map(|ndt| Utc.from_utc_datetime(&ndt))
}

fn parse_naive_iso(s: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt);
        }
    }
    None
}

fn parse_sql_naive(s: &str) -> Option<DateTime<Utc>> {
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    None
}

/// `DD/MM/YYYY[, HH:MM[:SS][ AM|PM]]`.
///
/// These strings were generated for display in the reference timezone, so
/// unlike the ISO shapes they are read as reference-local wall-clock time.
fn parse_slash_local(s: &str) -> Option<DateTime<Utc>> {
    let (date_part, time_part) = match s.split_once(',') {
        Some((d, t)) => (d.trim(), Some(t.trim())),
        None => (s, None),
    };
    let mut fields = date_part.split('/');
    let day: u32 = fields.next()?.trim().parse().ok()?;
    let month: u32 = fields.next()?.trim().parse().ok()?;
    let year: i32 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = match time_part {
        Some(t) if !t.is_empty() => parse_clock(t)?,
        _ => NaiveTime::MIN,
    };
    let local = pk_offset().from_local_datetime(&date.and_time(time)).single()?;
    Some(local.with_timezone(&Utc))
}

/// `HH:MM[:SS]` with an optional trailing `AM`/`PM` marker. The backend
/// stored some rows with a 12-hour clock (`%d/%m/%Y, %I:%M:%S %p`).
fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let mut parts = raw.split_whitespace();
    let hms = parts.next()?;
    let meridiem = parts.next();
    if parts.next().is_some() {
        return None;
    }
    let mut fields = hms.split(':');
    let mut hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = match fields.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    let second: u32 = match fields.next() {
        Some(sec) => sec.parse().ok()?,
        None => 0,
    };
    if fields.next().is_some() {
        return None;
    }
    match meridiem {
        Some(m) if m.eq_ignore_ascii_case("pm") => {
            if hour == 0 || hour > 12 {
                return None;
            }
            if hour != 12 {
                hour += 12;
            }
        }
        Some(m) if m.eq_ignore_ascii_case("am") => {
            if hour == 0 || hour > 12 {
                return None;
            }
            if hour == 12 {
                hour = 0;
            }
        }
        Some(_) => return None,
        None => {}
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn parse_fallback(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn epoch_seconds_ten_digits() {
        assert_eq!(
            parse_timestamp("1741634400"),
            Some(utc(2025, 3, 10, 19, 20, 0))
        );
    }

    #[test]
    fn epoch_millis_thirteen_digits() {
        assert_eq!(
            parse_timestamp("1741634400000"),
            Some(utc(2025, 3, 10, 19, 20, 0))
        );
    }

    #[test]
    fn iso_with_zulu() {
        assert_eq!(
            parse_timestamp("2025-03-10T19:30:00Z"),
            Some(utc(2025, 3, 10, 19, 30, 0))
        );
    }

    #[test]
    fn iso_with_offset() {
        assert_eq!(
            parse_timestamp("2025-03-10T19:30:00+05:00"),
            Some(utc(2025, 3, 10, 14, 30, 0))
        );
    }

    #[test]
    fn iso_with_colonless_offset() {
        assert_eq!(
            parse_timestamp("2025-03-10T19:30:00+0500"),
            Some(utc(2025, 3, 10, 14, 30, 0))
        );
    }

    #[test]
    fn naive_iso_read_as_utc() {
        assert_eq!(
            parse_timestamp("2025-03-10T19:30:00"),
            Some(utc(2025, 3, 10, 19, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2025-03-10T19:30"),
            Some(utc(2025, 3, 10, 19, 30, 0))
        );
    }

    #[test]
    fn sql_naive_with_fraction_read_as_utc() {
        assert_eq!(
            parse_timestamp("2025-03-10 19:30:00.123456"),
            parse_timestamp("2025-03-10T19:30:00.123456")
        );
        assert_eq!(
            parse_timestamp("2025-03-10 19:30"),
            Some(utc(2025, 3, 10, 19, 30, 0))
        );
    }

    #[test]
    fn slash_format_read_as_reference_local() {
        // 08:00 in UTC+5 is 03:00 UTC
        assert_eq!(
            parse_timestamp("10/03/2025, 08:00:00"),
            Some(utc(2025, 3, 10, 3, 0, 0))
        );
    }

    #[test]
    fn slash_format_date_only_is_local_midnight() {
        // midnight in UTC+5 is 19:00 UTC of the previous day
        assert_eq!(
            parse_timestamp("10/03/2025"),
            Some(utc(2025, 3, 9, 19, 0, 0))
        );
    }

    #[test]
    fn slash_format_with_meridiem() {
        assert_eq!(
            parse_timestamp("10/03/2025, 08:15:00 PM"),
            Some(utc(2025, 3, 10, 15, 15, 0))
        );
        assert_eq!(
            parse_timestamp("10/03/2025, 12:05:00 am"),
            Some(utc(2025, 3, 9, 19, 5, 0))
        );
    }

    #[test]
    fn slash_format_rejects_impossible_date() {
        assert_eq!(parse_timestamp("32/01/2025, 08:00:00"), None);
        assert_eq!(parse_timestamp("10/13/2025"), None);
    }

    #[test]
    fn fallback_accepts_rfc2822_and_bare_date() {
        assert_eq!(
            parse_timestamp("Mon, 10 Mar 2025 19:30:00 +0000"),
            Some(utc(2025, 3, 10, 19, 30, 0))
        );
        assert_eq!(parse_timestamp("2025-03-10"), Some(utc(2025, 3, 10, 0, 0, 0)));
    }

    #[test]
    fn unrecognized_shapes_are_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp("10-03-2025 08:00"), None);
    }

    #[test]
    fn value_string_and_number() {
        assert_eq!(
            parse_timestamp_value(&json!("2025-03-10T19:30:00Z")),
            Some(utc(2025, 3, 10, 19, 30, 0))
        );
        assert_eq!(
            parse_timestamp_value(&json!(1741634400i64)),
            Some(utc(2025, 3, 10, 19, 20, 0))
        );
        assert_eq!(
            parse_timestamp_value(&json!(1741634400000i64)),
            Some(utc(2025, 3, 10, 19, 20, 0))
        );
    }

    #[test]
    fn value_other_shapes_are_none() {
        assert_eq!(parse_timestamp_value(&Value::Null), None);
        assert_eq!(parse_timestamp_value(&json!(1741634400.5)), None);
        assert_eq!(parse_timestamp_value(&json!({"ts": 1})), None);
        assert_eq!(parse_timestamp_value(&json!(-5)), None);
    }
}
