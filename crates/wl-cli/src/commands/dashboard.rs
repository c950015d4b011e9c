//! Dashboard command for today's totals and the 7-day series.

use std::fmt::{self, Write as _};
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use wl_core::{DashboardSummary, DayWindow, OwnerId, WorkoutStore, build_dashboard};

/// Formats the human-readable dashboard.
pub fn format_dashboard(
    summary: &DashboardSummary,
    today: &DayWindow,
    timezone: &str,
) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(
        output,
        "DASHBOARD: {} ({timezone})",
        today.day.format("%A, %b %-d, %Y")
    )?;

    writeln!(output)?;
    writeln!(output, "TODAY")?;
    writeln!(output, "─────")?;
    writeln!(output, "Workouts: {}", summary.total_workouts)?;
    writeln!(output, "Calories burnt: {:.2} kcal", summary.total_calories_burnt)?;
    writeln!(
        output,
        "Average per workout: {:.2} kcal",
        summary.avg_calories_burnt_per_workout
    )?;

    writeln!(output)?;
    writeln!(output, "BY CATEGORY")?;
    writeln!(output, "───────────")?;
    if summary.pie_chart_data.is_empty() {
        writeln!(output, "(no workouts today)")?;
    }
    for slice in &summary.pie_chart_data {
        writeln!(output, "{}: {:.2} kcal", slice.label, slice.value)?;
    }

    writeln!(output)?;
    writeln!(output, "LAST 7 DAYS")?;
    writeln!(output, "───────────")?;
    let week = &summary.total_weeks_calories_burnt;
    for (label, calories) in week.weeks.iter().zip(&week.calories_burned) {
        writeln!(output, "{label}: {calories:.2} kcal")?;
    }

    Ok(output)
}

/// Runs the dashboard command.
pub fn run<W, S, Tz>(
    writer: &mut W,
    store: &S,
    owner: &OwnerId,
    now: DateTime<Utc>,
    tz: &Tz,
    timezone: &str,
    json: bool,
) -> Result<()>
where
    W: Write,
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
{
    let summary = build_dashboard(store, owner, now, tz).context("failed to build dashboard")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        let today = DayWindow::containing(now, tz);
        write!(writer, "{}", format_dashboard(&summary, &today, timezone)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use wl_core::{MemoryStore, submit_workouts};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn renders_today_and_week() {
        let mut store = MemoryStore::new();
        let owner = OwnerId::new("user-1").unwrap();
        let text = "#legs\n-squat\n-3 setsX8 reps\n-35 kg\n-20 min;\
                    #chest\n-press\n-5 setsX15 reps\n-70 kg\n-10 min;\
                    #legs\n-lunge\n-3 setsX12 reps\n-0 kg\n-15 min";
        submit_workouts(&mut store, &owner, text, utc("2025-01-29T08:00:00Z"), &Utc).unwrap();
        let earlier = "#chest\n-press\n-5 setsX15 reps\n-70 kg\n-4 min";
        submit_workouts(&mut store, &owner, earlier, utc("2025-01-27T18:00:00Z"), &Utc).unwrap();

        let mut output = Vec::new();
        run(&mut output, &store, &owner, utc("2025-01-29T20:00:00Z"), &Utc, "UTC", false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        DASHBOARD: Wednesday, Jan 29, 2025 (UTC)

        TODAY
        ─────
        Workouts: 3
        Calories burnt: 100.00 kcal
        Average per workout: 33.33 kcal

        BY CATEGORY
        ───────────
        legs: 50.00 kcal
        chest: 50.00 kcal

        LAST 7 DAYS
        ───────────
        23rd: 0.00 kcal
        24th: 0.00 kcal
        25th: 0.00 kcal
        26th: 0.00 kcal
        27th: 20.00 kcal
        28th: 0.00 kcal
        29th: 100.00 kcal
        ");
    }

    #[test]
    fn empty_day_shows_placeholder() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("user-1").unwrap();
        let mut output = Vec::new();
        run(&mut output, &store, &owner, utc("2025-03-02T09:00:00Z"), &Utc, "UTC", false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("DASHBOARD: Sunday, Mar 2, 2025 (UTC)\n"));
        assert!(output.contains("Workouts: 0\n"));
        assert!(output.contains("Average per workout: 0.00 kcal\n"));
        assert!(output.contains("(no workouts today)\n"));
        assert!(output.contains("24th: 0.00 kcal\n"));
        assert!(output.contains("2nd: 0.00 kcal\n"));
    }

    #[test]
    fn format_dashboard_renders_without_store() {
        let summary = DashboardSummary {
            total_calories_burnt: 12.5,
            total_workouts: 1,
            avg_calories_burnt_per_workout: 12.5,
            total_weeks_calories_burnt: wl_core::WeeklyCalories::default(),
            pie_chart_data: vec![wl_core::CategorySlice {
                id: 0,
                value: 12.5,
                label: "core".to_string(),
            }],
        };
        let today = DayWindow::containing(utc("2025-01-29T09:00:00Z"), &Utc);
        let output = format_dashboard(&summary, &today, "Europe/Paris").unwrap();
        assert!(output.starts_with("DASHBOARD: Wednesday, Jan 29, 2025 (Europe/Paris)\n"));
        assert!(output.contains("core: 12.50 kcal\n"));
        assert!(output.ends_with("LAST 7 DAYS\n───────────\n"));
    }

    #[test]
    fn json_uses_dashboard_field_names() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("user-1").unwrap();
        let mut output = Vec::new();
        run(&mut output, &store, &owner, utc("2025-01-29T09:00:00Z"), &Utc, "UTC", true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["totalWorkouts"], 0);
        assert_eq!(value["totalWeeksCaloriesBurnt"]["weeks"][6], "29th");
        assert_eq!(value["pieChartData"], serde_json::json!([]));
    }
}
