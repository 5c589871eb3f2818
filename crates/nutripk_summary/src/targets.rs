//! Daily intake targets and progress toward them.
//!
//! Targets are set during onboarding and stored on the user profile; signup
//! defaults apply when a field is missing. Progress percentages feed the
//! progress-ring widgets, so they are clamped to 0-100 and never NaN.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DayBucket;
use crate::nutrients::parse_amount_loose;

/// Millilitres per counted glass of water.
const GLASS_ML: f64 = 250.0;

/// Per-day intake targets.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct DailyTargets {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub water_glasses: u32,
}

impl Default for DailyTargets {
    fn default() -> Self {
        // standard reference intakes; water matches the 2000 ml signup default
        Self {
            calories: 2000.0,
            protein: 50.0,
            carbs: 275.0,
            fats: 70.0,
            water_glasses: 8,
        }
    }
}

impl DailyTargets {
    /// Read targets from a user-profile object, falling back to the defaults
    /// for missing or malformed fields. Water intake is stored in
    /// millilitres on the profile and converted to glasses here.
    pub fn from_profile(profile: &Value) -> Self {
        let defaults = Self::default();
        let Some(obj) = profile.as_object() else {
            return defaults;
        };
        let field = |key: &str, fallback: f64| -> f64 {
            obj.get(key).and_then(parse_amount_loose).unwrap_or(fallback)
        };
        let water_ml = field(
            "daily_water_intake",
            f64::from(defaults.water_glasses) * GLASS_ML,
        );
        Self {
            calories: field("target_calories", defaults.calories),
            protein: field("target_protein", defaults.protein),
            carbs: field("target_carbs", defaults.carbs),
            fats: field("target_fats", defaults.fats),
            water_glasses: (water_ml / GLASS_ML).round().max(0.0) as u32,
        }
    }
}

/// Progress toward each daily target as clamped 0-100 percentages.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetProgress {
    pub calories_pct: f64,
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fats_pct: f64,
    pub water_pct: f64,
}

fn pct(actual: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (actual / target * 100.0).clamp(0.0, 100.0)
}

/// How far a day's bucket has come toward the given targets.
pub fn target_progress(day: &DayBucket, targets: &DailyTargets) -> TargetProgress {
    TargetProgress {
        calories_pct: pct(day.total_calories, targets.calories),
        protein_pct: pct(day.total_protein, targets.protein),
        carbs_pct: pct(day.total_carbs, targets.carbs),
        fats_pct: pct(day.total_fats, targets.fats),
        water_pct: pct(
            f64::from(day.water_glasses),
            f64::from(targets.water_glasses),
        ),
    }
}
