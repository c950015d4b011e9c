//! Workouts command: the entries logged on one day.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use wl_core::{DayWindow, OwnerId, WorkoutStore, list_workouts_for_day};

use super::format_entry;

/// Lists `owner`'s workouts for `date`, or for today when no date is given.
pub fn run<W, S, Tz>(
    writer: &mut W,
    store: &S,
    owner: &OwnerId,
    date: Option<NaiveDate>,
    now: DateTime<Utc>,
    tz: &Tz,
    json: bool,
) -> Result<()>
where
    W: Write,
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let day = date.unwrap_or_else(|| DayWindow::containing(now, tz).day);
    let listing =
        list_workouts_for_day(store, owner, day, tz).context("failed to list workouts")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&listing)?)?;
        return Ok(());
    }

    writeln!(writer, "WORKOUTS: {}", day.format("%A, %b %-d, %Y"))?;
    writeln!(writer)?;
    if listing.todays_workouts.is_empty() {
        writeln!(writer, "No workouts logged.")?;
        return Ok(());
    }
    for entry in &listing.todays_workouts {
        let at = entry.date.with_timezone(tz).format("%H:%M");
        writeln!(writer, "{at}  {}", format_entry(entry))?;
    }
    writeln!(writer)?;
    writeln!(writer, "Total: {:.2} kcal", listing.total_calories_burnt)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use insta::assert_snapshot;
    use wl_core::{MemoryStore, submit_workouts};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn seeded(owner: &OwnerId) -> MemoryStore {
        let mut store = MemoryStore::new();
        let morning = "#legs\n-squat\n-3 setsX8 reps\n-35 kg\n-20 min";
        let evening = "#chest\n-press\n-5 setsX15 reps\n-70 kg\n-10 min";
        submit_workouts(&mut store, owner, morning, utc("2025-01-29T07:15:00Z"), &Utc).unwrap();
        submit_workouts(&mut store, owner, evening, utc("2025-01-29T18:40:00Z"), &Utc).unwrap();
        submit_workouts(&mut store, owner, evening, utc("2025-01-28T18:40:00Z"), &Utc).unwrap();
        store
    }

    #[test]
    fn lists_todays_entries_in_order() {
        let owner = OwnerId::new("user-1").unwrap();
        let store = seeded(&owner);
        let mut output = Vec::new();
        run(&mut output, &store, &owner, None, utc("2025-01-29T21:00:00Z"), &Utc, false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        WORKOUTS: Wednesday, Jan 29, 2025

        07:15  legs / squat: 3 x 8 @ 35 kg, 20 min, 50.00 kcal
        18:40  chest / press: 5 x 15 @ 70 kg, 10 min, 50.00 kcal

        Total: 100.00 kcal
        ");
    }

    #[test]
    fn explicit_date_and_local_times() {
        let owner = OwnerId::new("user-1").unwrap();
        let store = seeded(&owner);
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 1, 28);
        let mut output = Vec::new();
        run(&mut output, &store, &owner, day, utc("2025-01-29T21:00:00Z"), &tz, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("WORKOUTS: Tuesday, Jan 28, 2025\n"));
        assert!(output.contains("20:40  chest / press"));
        assert!(output.contains("Total: 50.00 kcal"));
    }

    #[test]
    fn empty_day_and_json_shape() {
        let owner = OwnerId::new("user-1").unwrap();
        let store = seeded(&owner);
        let day = NaiveDate::from_ymd_opt(2025, 1, 1);

        let mut output = Vec::new();
        run(&mut output, &store, &owner, day, Utc::now(), &Utc, false).unwrap();
        assert!(String::from_utf8(output).unwrap().ends_with("No workouts logged.\n"));

        let mut output = Vec::new();
        run(&mut output, &store, &owner, day, Utc::now(), &Utc, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["todaysWorkouts"], serde_json::json!([]));
        assert_eq!(value["totalCaloriesBurnt"], 0.0);
    }
}
