//! Permissive nutrient extraction.
//!
//! Nutrient maps come from a food-recognition model and have no stable
//! schema: keys vary (`Calories`, `ENERC_KCAL`, `Energy (kcal)`) and values
//! may be numbers or display strings (`"250 kcal"`, `"12g"`). Extraction
//! scans keys case-insensitively for category substrings and pulls the first
//! decimal number out of each value; anything unrecognized contributes zero.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::MealRecord;

/// Key substrings identifying each tracked category.
const CALORIE_KEYS: &[&str] = &["calor", "enerc", "kcal", "energy"];
const PROTEIN_KEYS: &[&str] = &["protein"];
const CARB_KEYS: &[&str] = &["carb"];
const FAT_KEYS: &[&str] = &["fat"];

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid regex"));

/// Summed amounts of the four tracked categories for one meal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Pull the first decimal number out of a JSON value.
///
/// Numbers pass through if finite and non-negative; strings yield their
/// first decimal substring, with `.` or `,` accepted as the separator.
pub fn parse_amount_loose(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64()?;
            (v.is_finite() && v >= 0.0).then_some(v)
        }
        Value::String(s) => {
            let found = FIRST_NUMBER.find(s)?;
            let normalized = found.as_str().replace(',', ".");
            let v: f64 = normalized.parse().ok()?;
            v.is_finite().then_some(v)
        }
        _ => None,
    }
}

fn matches_any(key: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| key.contains(needle))
}

/// Sum the tracked categories out of a meal's nutrient map.
///
/// A category that sums to zero falls back to the meal's top-level field,
/// because older rows stored flat columns instead of a nutrient map.
pub fn extract_nutrients(meal: &MealRecord) -> NutrientTotals {
    let mut totals = NutrientTotals::default();
    if let Some(nutrients) = &meal.nutrients {
        for (key, value) in nutrients {
            let Some(amount) = parse_amount_loose(value) else {
                continue;
            };
            let key = key.to_lowercase();
            if matches_any(&key, CALORIE_KEYS) {
                totals.calories += amount;
            }
            if matches_any(&key, PROTEIN_KEYS) {
                totals.protein += amount;
            }
            if matches_any(&key, CARB_KEYS) {
                totals.carbs += amount;
            }
            if matches_any(&key, FAT_KEYS) {
                totals.fats += amount;
            }
        }
    }
    if totals.calories == 0.0 {
        totals.calories = top_level(&meal.calories);
    }
    if totals.protein == 0.0 {
        totals.protein = top_level(&meal.protein);
    }
    if totals.carbs == 0.0 {
        totals.carbs = top_level(&meal.carbs);
    }
    if totals.fats == 0.0 {
        totals.fats = top_level(&meal.fats);
    }
    totals
}

fn top_level(field: &Option<Value>) -> f64 {
    field.as_ref().and_then(parse_amount_loose).unwrap_or(0.0)
}
