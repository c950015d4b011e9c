//! CLI subcommand implementations.

pub mod add;
pub mod check;
pub mod dashboard;
pub mod workouts;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use wl_core::{OwnerId, WorkoutEntry};

use crate::Config;

/// Picks the `--owner` flag over the configured owner.
pub fn resolve_owner(flag: Option<&str>, config: &Config) -> Result<OwnerId> {
    let Some(raw) = flag.or(config.owner.as_deref()) else {
        bail!("no owner given: pass --owner or set `owner` in the config");
    };
    OwnerId::new(raw).context("invalid owner")
}

/// Reads workout text from `file`, or from stdin when no file is given.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read workout text from stdin")?;
            Ok(text)
        }
    }
}

/// One-line human rendering of a stored entry.
fn format_entry(entry: &WorkoutEntry) -> String {
    format!(
        "{} / {}: {} x {} @ {} kg, {} min, {:.2} kcal",
        entry.category,
        entry.workout_name,
        entry.sets,
        entry.reps,
        entry.weight_kg,
        entry.duration_min,
        entry.calories_burned,
    )
}
