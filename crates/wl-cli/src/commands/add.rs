//! Add command: logs the workouts in a piece of text.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use wl_core::{OwnerId, WorkoutEntry, WorkoutStore, submit_workouts};

use super::format_entry;

const ADDED_MESSAGE: &str = "Workouts added successfully";

#[derive(Serialize)]
struct AddResponse<'a> {
    message: &'static str,
    workouts: &'a [WorkoutEntry],
}

/// Submits `raw` for `owner` and prints the stored entries.
pub fn run<W, S, Tz>(
    writer: &mut W,
    store: &mut S,
    owner: &OwnerId,
    raw: &str,
    now: DateTime<Utc>,
    tz: &Tz,
    json: bool,
) -> Result<()>
where
    W: Write,
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
{
    let entries = submit_workouts(store, owner, raw, now, tz).context("failed to add workouts")?;

    if json {
        let response = AddResponse {
            message: ADDED_MESSAGE,
            workouts: &entries,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&response)?)?;
        return Ok(());
    }

    writeln!(writer, "{ADDED_MESSAGE}")?;
    for entry in &entries {
        writeln!(writer, "- {}", format_entry(entry))?;
    }
    Ok(())
}
