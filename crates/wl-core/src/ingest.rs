//! Workout submission: parse, validate, de-duplicate, estimate, store.
//!
//! A submission is atomic. Every draft is validated and checked for
//! duplicates before anything is written, and the write itself stores all
//! entries or none.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::guard::{DuplicateError, find_duplicates};
use crate::parser::{ParseError, parse};
use crate::store::{StoreError, WorkoutStore};
use crate::types::{EntryDraft, NewWorkout, OwnerId, ValidationError, WorkoutEntry};
use crate::window::DayWindow;

/// Why a submission was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngestError {
    #[error("workout text is empty")]
    EmptySubmission,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Duplicate(#[from] DuplicateError),

    /// Store detail is logged, not carried.
    #[error("failed to save workouts")]
    Store,
}

fn store_failure(err: &StoreError) -> IngestError {
    tracing::error!(error = %err, "workout store failed");
    IngestError::Store
}

/// Parses and validates submitted text without touching a store.
pub fn prepare_drafts(raw: &str) -> Result<Vec<EntryDraft>, IngestError> {
    let drafts = parse(raw)?;
    if drafts.is_empty() {
        return Err(IngestError::EmptySubmission);
    }
    for draft in &drafts {
        draft.validate()?;
    }
    tracing::debug!(blocks = drafts.len(), "parsed workout text");
    Ok(drafts)
}

/// Logs every workout in `raw` for `owner_id` at `now`.
///
/// Returns the stored entries in textual order.
pub fn submit_workouts<S, Tz>(
    store: &mut S,
    owner_id: &OwnerId,
    raw: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<Vec<WorkoutEntry>, IngestError>
where
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
{
    let drafts = prepare_drafts(raw)?;
    let window = DayWindow::containing(now, tz);

    let duplicates =
        find_duplicates(&*store, owner_id, &drafts, &window).map_err(|e| store_failure(&e))?;
    if let Some(first) = duplicates.into_iter().next() {
        tracing::warn!(
            owner = %owner_id,
            entry = first.block_index + 1,
            category = %first.category,
            workout = %first.workout_name,
            "duplicate workout rejected"
        );
        return Err(first.into());
    }

    let workouts = drafts
        .iter()
        .cloned()
        .map(|draft| NewWorkout::from_draft(owner_id, draft, now, window.day))
        .collect::<Result<Vec<_>, _>>()?;

    let ids = match store.insert_all(&workouts) {
        Ok(ids) => ids,
        Err(StoreError::Conflict) => {
            // Another writer got there between the check and the write.
            let racing = find_duplicates(&*store, owner_id, &drafts, &window)
                .map_err(|e| store_failure(&e))?
                .into_iter()
                .next()
                .or_else(|| drafts.first().map(DuplicateError::for_draft));
            tracing::warn!(owner = %owner_id, "store rejected duplicate workout on write");
            return Err(racing.map_or(IngestError::Store, IngestError::Duplicate));
        }
        Err(err) => return Err(store_failure(&err)),
    };

    let entries: Vec<WorkoutEntry> = workouts
        .into_iter()
        .zip(ids)
        .map(|(workout, id)| workout.into_entry(id))
        .collect();
    tracing::info!(owner = %owner_id, count = entries.len(), day = %window.day, "workouts stored");
    Ok(entries)
}

/// Advisory pre-check: the drafts in `raw` already logged today.
///
/// An empty result does not guarantee [`submit_workouts`] will succeed.
pub fn check_submission<S, Tz>(
    store: &S,
    owner_id: &OwnerId,
    raw: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<Vec<DuplicateError>, IngestError>
where
    S: WorkoutStore + ?Sized,
    Tz: TimeZone,
{
    let drafts = prepare_drafts(raw)?;
    let window = DayWindow::containing(now, tz);
    find_duplicates(store, owner_id, &drafts, &window).map_err(|e| store_failure(&e))
}
