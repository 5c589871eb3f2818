//! Weekly and daily aggregation of NutriPK meal records.
//!
//! Takes already-fetched backend payloads (meals, water intake, the user
//! profile) and produces Monday-start week windows of [`DayBucket`]s with
//! summed nutrient totals, plus per-day groupings and daily-target progress.
//! Everything here is a pure, stateless batch transform: network and storage
//! belong to the callers.
//!
//! A single malformed record never aborts a batch; bad rows are skipped with
//! a log line and the rest of the data still aggregates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use nutripk_time::{day_label, iso_day};

pub mod nutrients;
pub mod targets;
pub mod week;

pub use nutrients::NutrientTotals;
pub use targets::{DailyTargets, TargetProgress, target_progress};
pub use week::{apply_water, assign_meals, build_week, group_by_day, week_totals};

/// Aggregation errors.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for aggregation operations.
pub type SummaryResult<T> = Result<T, SummaryError>;

/// One meal as stored by the backend. Read-only input to aggregation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MealRecord {
    /// Raw timestamp in whatever shape the row was written with; see
    /// `nutripk_time::parse_timestamp` for the recognized shapes.
    #[serde(default)]
    pub timestamp: Value,
    #[serde(default)]
    pub name: Option<String>,
    /// Nutrient name -> amount. Keys come from a food-recognition model and
    /// have no stable schema; values may be numbers or display strings like
    /// `"250 kcal"` or `"12g"`.
    #[serde(default)]
    pub nutrients: Option<Map<String, Value>>,
    // Older rows stored flat columns instead of a nutrient map.
    #[serde(default)]
    pub calories: Option<Value>,
    #[serde(default)]
    pub protein: Option<Value>,
    #[serde(default)]
    pub carbs: Option<Value>,
    #[serde(default)]
    pub fats: Option<Value>,
}

/// Daily water intake as returned by the backend water endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct WaterRecord {
    /// `YYYY-MM-DD`, same convention as [`DayBucket::date`].
    pub date: String,
    #[serde(default)]
    pub glasses: i64,
}

/// Aggregated nutrient/meal totals for one reference-local calendar day.
///
/// The presentation layer consumes these as JSON; every numeric field is
/// always present, finite and non-negative.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// ISO date in the reference timezone; the join key for meals and water.
    pub date: String,
    /// Display label, e.g. `"Mon 10 Mar"`.
    pub label: String,
    /// Position within a Monday-start week: 0 = Monday .. 6 = Sunday.
    pub ordinal: u8,
    pub meal_count: u32,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
    pub water_glasses: u32,
}

impl DayBucket {
    pub(crate) fn empty(date: NaiveDate) -> Self {
        Self {
            date: iso_day(date),
            label: day_label(date),
            ordinal: date.weekday().num_days_from_monday() as u8,
            meal_count: 0,
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fats: 0.0,
            water_glasses: 0,
        }
    }

    pub(crate) fn add_meal(&mut self, meal: &MealRecord) {
        let n = nutrients::extract_nutrients(meal);
        self.meal_count += 1;
        self.total_calories += n.calories;
        self.total_protein += n.protein;
        self.total_carbs += n.carbs;
        self.total_fats += n.fats;
    }
}

/// Week-level sums across the seven buckets of a window.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct WeekTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub meals: u32,
}

/// Extract meal records from the backend `{"meals": [...]}` envelope.
///
/// A missing `meals` key is an empty list (legacy behavior); a malformed
/// element is skipped so one bad row never loses the rest of the batch.
pub fn meals_from_payload(payload: &Value) -> SummaryResult<Vec<MealRecord>> {
    collect_records(payload, "meals")
}

/// Extract water records from the backend `{"water": [...]}` envelope.
pub fn water_from_payload(payload: &Value) -> SummaryResult<Vec<WaterRecord>> {
    collect_records(payload, "water")
}

/// Parse a raw JSON response body and extract the meal records from it.
pub fn meals_from_json(body: &str) -> SummaryResult<Vec<MealRecord>> {
    let payload: Value = serde_json::from_str(body)?;
    meals_from_payload(&payload)
}

/// Parse a raw JSON response body and extract the water records from it.
pub fn water_from_json(body: &str) -> SummaryResult<Vec<WaterRecord>> {
    let payload: Value = serde_json::from_str(body)?;
    water_from_payload(&payload)
}

fn collect_records<T>(payload: &Value, key: &str) -> SummaryResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let obj = payload
        .as_object()
        .ok_or_else(|| SummaryError::Validation("payload is not a JSON object".into()))?;
    let Some(raw) = obj.get(key) else {
        return Ok(Vec::new());
    };
    let arr = raw
        .as_array()
        .ok_or_else(|| SummaryError::Validation(format!("`{key}` is not an array")))?;
    let mut records = Vec::with_capacity(arr.len());
    for item in arr {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => records.push(record),
            Err(err) => tracing::debug!("skipping malformed `{}` record: {}", key, err),
        }
    }
    Ok(records)
}
