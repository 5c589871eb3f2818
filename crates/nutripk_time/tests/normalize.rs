use chrono::{TimeZone, Utc};
use nutripk_time::{add_days_iso, format_date, format_time, parse_timestamp, to_iso_date};
use serde_json::json;

#[test]
fn all_utc_shapes_of_one_instant_agree() {
    // 2025-03-10 19:20:00 UTC written in every UTC-interpreted stored shape
    let expected = Utc.with_ymd_and_hms(2025, 3, 10, 19, 20, 0).unwrap();
    for raw in [
        "1741634400",
        "1741634400000",
        "2025-03-10T19:20:00Z",
        "2025-03-10T19:20:00",
        "2025-03-10 19:20:00",
        "2025-03-11T00:20:00+05:00",
    ] {
        assert_eq!(parse_timestamp(raw), Some(expected), "shape {raw:?}");
    }
}

#[test]
fn slash_shape_is_reference_local() {
    // 00:20 reference-local on the 11th equals 19:20 UTC on the 10th
    assert_eq!(
        parse_timestamp("11/03/2025, 00:20:00"),
        Some(Utc.with_ymd_and_hms(2025, 3, 10, 19, 20, 0).unwrap())
    );
}

#[test]
fn formatting_examples() {
    assert_eq!(
        format_time(&json!("2025-03-10T19:30:00Z")),
        Some("12:30 AM".into())
    );
    assert_eq!(
        format_date(&json!("2025-03-10T19:30:00Z")),
        Some("11/03/2025".into())
    );
}

#[test]
fn iso_date_tracks_reference_day_boundary() {
    // 18:59 UTC is 23:59 local (same day); 19:00 UTC tips into the next day
    assert_eq!(
        to_iso_date(&json!("2025-03-10T18:59:59Z")),
        Some("2025-03-10".into())
    );
    assert_eq!(
        to_iso_date(&json!("2025-03-10T19:00:00Z")),
        Some("2025-03-11".into())
    );
}

#[test]
fn add_days_iso_rollovers() {
    assert_eq!(add_days_iso("2025-01-31", 1), Some("2025-02-01".into()));
    assert_eq!(add_days_iso("2025-03-01", -1), Some("2025-02-28".into()));
    assert_eq!(add_days_iso("2024-12-31", 1), Some("2025-01-01".into()));
    assert_eq!(add_days_iso("2025-01-01", -1), Some("2024-12-31".into()));
}
