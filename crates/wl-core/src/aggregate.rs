//! Dashboard statistics.
//!
//! All figures are scoped to one owner and computed from calendar-day
//! windows of the reference timezone:
//!
//! - today's calorie total, workout count and average per workout
//! - today's calories per category, in first-logged order
//! - calories per day for the 7 days ending today, oldest first

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::store::{GroupField, StoreError, WorkoutFilter, WorkoutStore};
use crate::types::{OwnerId, WorkoutEntry};
use crate::window::{DayWindow, TimeRange};

/// Number of days in the rolling series.
pub const WEEK_DAYS: u64 = 7;

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_calories_burnt: f64,
    pub total_workouts: u64,
    pub avg_calories_burnt_per_workout: f64,
    pub total_weeks_calories_burnt: WeeklyCalories,
    pub pie_chart_data: Vec<CategorySlice>,
}

/// Rolling per-day calorie totals, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCalories {
    /// Day-of-month labels such as `"29th"`.
    pub weeks: Vec<String>,
    pub calories_burned: Vec<f64>,
}

/// One category's share of today's calories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub id: usize,
    pub value: f64,
    pub label: String,
}

/// The raw entries of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWorkouts {
    pub todays_workouts: Vec<WorkoutEntry>,
    pub total_calories_burnt: f64,
}

/// Builds the dashboard for `owner_id` as of `now`.
pub fn build_dashboard<S, Tz>(
    store: &S,
    owner_id: &OwnerId,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<DashboardSummary, StoreError>
where
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
{
    let today = DayWindow::containing(now, tz);
    let today_filter = WorkoutFilter::owner(owner_id).within(today.range());

    let total_workouts = store.count(&today_filter)?;
    let total_calories_burnt = store.sum_calories(&today_filter)?;

    let pie_chart_data = store
        .sum_calories_by(&today_filter, GroupField::Category)?
        .into_iter()
        .enumerate()
        .map(|(id, (label, value))| CategorySlice { id, value, label })
        .collect();

    let total_weeks_calories_burnt = weekly_series(store, owner_id, today.day, tz)?;

    tracing::debug!(
        owner = %owner_id,
        day = %today.day,
        total_workouts,
        total_calories_burnt,
        "built dashboard"
    );

    Ok(DashboardSummary {
        total_calories_burnt,
        total_workouts,
        avg_calories_burnt_per_workout: average(total_calories_burnt, total_workouts),
        total_weeks_calories_burnt,
        pie_chart_data,
    })
}

/// Entries logged on `day`, in logged order, with their calorie total.
pub fn list_workouts_for_day<S, Tz>(
    store: &S,
    owner_id: &OwnerId,
    day: NaiveDate,
    tz: &Tz,
) -> Result<DayWorkouts, StoreError>
where
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
{
    let window = DayWindow::for_day(day, tz);
    let todays_workouts = store.find_many(&WorkoutFilter::owner(owner_id).within(window.range()))?;
    let total_calories_burnt = todays_workouts.iter().map(|w| w.calories_burned).sum();
    Ok(DayWorkouts {
        todays_workouts,
        total_calories_burnt,
    })
}

#[allow(clippy::cast_precision_loss)]
fn average(total: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// One read over the whole span, bucketed by each day's window.
fn weekly_series<S, Tz>(
    store: &S,
    owner_id: &OwnerId,
    today: NaiveDate,
    tz: &Tz,
) -> Result<WeeklyCalories, StoreError>
where
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
{
    let windows = DayWindow::days_ending(today, WEEK_DAYS, tz);
    let (Some(first), Some(last)) = (windows.first(), windows.last()) else {
        return Ok(WeeklyCalories::default());
    };
    let span = TimeRange {
        start: first.start,
        end: last.end,
    };
    let entries = store.find_many(&WorkoutFilter::owner(owner_id).within(span))?;

    let mut series = WeeklyCalories::default();
    for window in &windows {
        series.weeks.push(day_label(window.day));
        series.calories_burned.push(
            entries
                .iter()
                .filter(|entry| window.contains(entry.date))
                .map(|entry| entry.calories_burned)
                .sum(),
        );
    }
    Ok(series)
}

/// Day of month with its English ordinal suffix.
pub fn day_label(day: NaiveDate) -> String {
    let d = day.day();
    let suffix = match (d % 10, d % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    format!("{d}{suffix}")
}
