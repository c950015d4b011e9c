//! Duplicate guard: one entry per owner, category, name and calendar day.

use std::collections::HashSet;

use thiserror::Error;

use crate::store::{StoreError, WorkoutFilter, WorkoutStore};
use crate::types::{EntryDraft, OwnerId};
use crate::window::DayWindow;

/// A draft that repeats a workout already logged that day.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "entry {}: workout already exists for today: {category} / {workout_name}",
    .block_index + 1
)]
pub struct DuplicateError {
    pub block_index: usize,
    pub category: String,
    pub workout_name: String,
}

impl DuplicateError {
    pub(crate) fn for_draft(draft: &EntryDraft) -> Self {
        Self {
            block_index: draft.block_index,
            category: draft.category.clone(),
            workout_name: draft.workout_name.clone(),
        }
    }
}

/// Whether the owner already logged this category and name within `window`.
///
/// Single-lookup form for library callers checking one workout. Submissions
/// go through [`find_duplicates`], which reads the day once for all drafts.
pub fn check_duplicate<S: WorkoutStore + ?Sized>(
    store: &S,
    owner_id: &OwnerId,
    category: &str,
    workout_name: &str,
    window: &DayWindow,
) -> Result<bool, StoreError> {
    let filter = WorkoutFilter::owner(owner_id)
        .within(window.range())
        .named(category, workout_name);
    Ok(store.find_one(&filter)?.is_some())
}

/// Every draft that is already stored within `window` or repeats an earlier
/// draft of the same submission, in textual order.
///
/// Reads the owner's entries for the window once rather than per draft.
pub fn find_duplicates<S: WorkoutStore + ?Sized>(
    store: &S,
    owner_id: &OwnerId,
    drafts: &[EntryDraft],
    window: &DayWindow,
) -> Result<Vec<DuplicateError>, StoreError> {
    let filter = WorkoutFilter::owner(owner_id).within(window.range());
    let mut taken: HashSet<(String, String)> = store
        .find_many(&filter)?
        .into_iter()
        .map(|entry| (entry.category, entry.workout_name))
        .collect();

    let duplicates: Vec<DuplicateError> = drafts
        .iter()
        .filter(|draft| !taken.insert((draft.category.clone(), draft.workout_name.clone())))
        .map(DuplicateError::for_draft)
        .collect();

    if !duplicates.is_empty() {
        tracing::debug!(
            owner = %owner_id,
            day = %window.day,
            count = duplicates.len(),
            "duplicate workouts found"
        );
    }
    Ok(duplicates)
}
