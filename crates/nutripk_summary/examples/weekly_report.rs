//! Print a Monday-start weekly summary from a saved backend response.
//!
//! Usage: `cargo run --example weekly_report -- meals.json [water.json]`
//! where each file holds the raw `{"meals": [...]}` / `{"water": [...]}`
//! JSON the backend returns.

use chrono::Utc;
use nutripk_summary::{
    apply_water, assign_meals, build_week, meals_from_json, water_from_json, week_totals,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure logging from `NUTRIPK_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("NUTRIPK_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(meals_path) = args.next() else {
        eprintln!("usage: weekly_report <meals.json> [water.json]");
        return Ok(());
    };

    let meals = meals_from_json(&std::fs::read_to_string(&meals_path)?)?;
    tracing::info!("loaded {} meal records from {}", meals.len(), meals_path);

    let mut week = assign_meals(&meals, build_week(Utc::now()));
    if let Some(water_path) = args.next() {
        let water = water_from_json(&std::fs::read_to_string(&water_path)?)?;
        week = apply_water(week, &water);
    }

    for bucket in &week {
        println!(
            "{}  meals: {:>2}  kcal: {:>7.1}  protein: {:>6.1}  carbs: {:>6.1}  fats: {:>6.1}  water: {}",
            bucket.label,
            bucket.meal_count,
            bucket.total_calories,
            bucket.total_protein,
            bucket.total_carbs,
            bucket.total_fats,
            bucket.water_glasses,
        );
    }
    let totals = week_totals(&week);
    println!(
        "week totals  meals: {}  kcal: {:.1}  protein: {:.1}  carbs: {:.1}  fats: {:.1}",
        totals.meals, totals.calories, totals.protein, totals.carbs, totals.fats
    );
    Ok(())
}
