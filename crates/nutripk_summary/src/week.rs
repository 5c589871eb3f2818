//! Monday-start week windows and day bucketing.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde_json::Value;

use nutripk_time::{iso_date, parse_timestamp_value, to_pk_local};

use crate::{DayBucket, MealRecord, WaterRecord, WeekTotals};

/// Build the week window containing `reference` in reference-local time.
///
/// Always exactly seven zeroed buckets, Monday through Sunday, regardless of
/// which weekday `reference` falls on.
pub fn build_week(reference: DateTime<Utc>) -> Vec<DayBucket> {
    let local_date = to_pk_local(reference).date_naive();
    let monday = local_date - Duration::days(local_date.weekday().num_days_from_monday() as i64);
    (0..7)
        .map(|i| DayBucket::empty(monday + Duration::days(i)))
        .collect()
}

/// Assign meals to a week's buckets by reference-local calendar day.
///
/// Meals with unparseable timestamps are dropped with a log line; meals whose
/// day falls outside the window are silently skipped (expected for data
/// beyond the queried range). Buckets accumulate only what this call adds,
/// so assigning the same meals to a freshly built week is idempotent.
pub fn assign_meals(meals: &[MealRecord], mut week: Vec<DayBucket>) -> Vec<DayBucket> {
    for meal in meals {
        let Some(instant) = parse_timestamp_value(&meal.timestamp) else {
            tracing::debug!(
                "skipping meal with unparseable timestamp: {:?}",
                meal.timestamp
            );
            continue;
        };
        let date = iso_date(instant);
        let Some(bucket) = week.iter_mut().find(|b| b.date == date) else {
            continue;
        };
        bucket.add_meal(meal);
    }
    week
}

/// Attach water-glass counts to matching buckets.
///
/// Records are joined on the ISO date; dates outside the window are skipped.
/// The backend returns at most one row per day, so a later duplicate simply
/// overwrites.
pub fn apply_water(mut week: Vec<DayBucket>, water: &[WaterRecord]) -> Vec<DayBucket> {
    for record in water {
        let Some(bucket) = week.iter_mut().find(|b| b.date == record.date) else {
            continue;
        };
        bucket.water_glasses = record.glasses.max(0) as u32;
    }
    week
}

/// Elementwise sums across a window's buckets.
pub fn week_totals(week: &[DayBucket]) -> WeekTotals {
    let mut totals = WeekTotals::default();
    for bucket in week {
        totals.calories += bucket.total_calories;
        totals.protein += bucket.total_protein;
        totals.carbs += bucket.total_carbs;
        totals.fats += bucket.total_fats;
        totals.meals += bucket.meal_count;
    }
    totals
}

/// Bucket every parseable meal by reference-local day, with no week
/// restriction. Keys are ISO dates, so iteration is chronological.
pub fn group_by_day(meals: &[MealRecord]) -> BTreeMap<String, DayBucket> {
    let mut days: BTreeMap<String, DayBucket> = BTreeMap::new();
    for meal in meals {
        let Some(instant) = parse_timestamp_value(&meal.timestamp) else {
            tracing::debug!(
                "skipping meal with unparseable timestamp: {:?}",
                meal.timestamp
            );
            continue;
        };
        let local_date = to_pk_local(instant).date_naive();
        days.entry(iso_date(instant))
            .or_insert_with(|| DayBucket::empty(local_date))
            .add_meal(meal);
    }
    days
}

/// Convenience for callers holding a raw timestamp and a prebuilt week:
/// which bucket, if any, does this timestamp land in?
pub fn bucket_index_for(week: &[DayBucket], raw: &Value) -> Option<usize> {
    let date = iso_date(parse_timestamp_value(raw)?);
    week.iter().position(|b| b.date == date)
}
