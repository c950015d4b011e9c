//! Check command: advisory duplicate pre-check.
//!
//! Nothing is written. A clean result does not guarantee a later `wl add`
//! succeeds, since another submission can land in between.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use wl_core::{DuplicateError, OwnerId, WorkoutStore, check_submission};

#[derive(Serialize)]
struct CheckResponse {
    exists: bool,
    duplicates: Vec<DuplicateJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DuplicateJson {
    /// 1-based position of the block in the text.
    entry: usize,
    category: String,
    workout_name: String,
}

impl From<DuplicateError> for DuplicateJson {
    fn from(dup: DuplicateError) -> Self {
        Self {
            entry: dup.block_index + 1,
            category: dup.category,
            workout_name: dup.workout_name,
        }
    }
}

/// Prints whether any workout in `raw` was already logged today.
pub fn run<W, S, Tz>(
    writer: &mut W,
    store: &S,
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
    let duplicates =
        check_submission(store, owner, raw, now, tz).context("failed to check workouts")?;

    if json {
        let response = CheckResponse {
            exists: !duplicates.is_empty(),
            duplicates: duplicates.into_iter().map(DuplicateJson::from).collect(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&response)?)?;
        return Ok(());
    }

    writeln!(writer, "exists: {}", !duplicates.is_empty())?;
    for dup in &duplicates {
        writeln!(writer, "- {dup}")?;
    }
    Ok(())
}
