//! The record store the core reads from and writes to.
//!
//! The parser and estimator never touch a store; only the duplicate guard,
//! ingestion and the aggregator do, always through [`WorkoutStore`].

use thiserror::Error;

use crate::types::{NewWorkout, OwnerId, WorkoutEntry};
use crate::window::TimeRange;

/// Store failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A write would break the one-entry-per-day uniqueness key.
    #[error("workout already exists for that day")]
    Conflict,
    /// Any other backend failure. The message is internal detail.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Selects the entries of one owner, optionally narrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutFilter {
    pub owner_id: OwnerId,
    pub category: Option<String>,
    pub workout_name: Option<String>,
    pub range: Option<TimeRange>,
}

impl WorkoutFilter {
    pub fn owner(owner_id: &OwnerId) -> Self {
        Self {
            owner_id: owner_id.clone(),
            category: None,
            workout_name: None,
            range: None,
        }
    }

    #[must_use]
    pub fn within(mut self, range: TimeRange) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn named(mut self, category: &str, workout_name: &str) -> Self {
        self.category = Some(category.to_string());
        self.workout_name = Some(workout_name.to_string());
        self
    }

    /// Whether an entry satisfies every condition of the filter.
    pub fn matches(&self, entry: &WorkoutEntry) -> bool {
        entry.owner_id == self.owner_id
            && self.category.as_ref().is_none_or(|c| *c == entry.category)
            && self
                .workout_name
                .as_ref()
                .is_none_or(|n| *n == entry.workout_name)
            && self.range.is_none_or(|r| r.contains(entry.date))
    }
}

/// Field to group calorie sums by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Category,
}

/// Minimal capability the core needs from persistent storage.
pub trait WorkoutStore {
    /// Stores every workout or none of them, returning IDs in input order.
    ///
    /// Fails with [`StoreError::Conflict`] if any workout repeats an
    /// `(owner, category, name, day)` key already stored or earlier in the batch.
    /// `day` is fixed at write time, so the key only agrees with the
    /// duplicate guard while every writer uses the same reference timezone.
    /// Reads never group or filter by it.
    fn insert_all(&mut self, workouts: &[NewWorkout]) -> Result<Vec<i64>, StoreError>;

    fn insert(&mut self, workout: &NewWorkout) -> Result<i64, StoreError> {
        let ids = self.insert_all(std::slice::from_ref(workout))?;
        ids.first()
            .copied()
            .ok_or_else(|| StoreError::Backend("insert returned no id".to_string()))
    }

    fn find_one(&self, filter: &WorkoutFilter) -> Result<Option<WorkoutEntry>, StoreError>;

    /// Matching entries ordered by date, then ID.
    fn find_many(&self, filter: &WorkoutFilter) -> Result<Vec<WorkoutEntry>, StoreError>;

    fn count(&self, filter: &WorkoutFilter) -> Result<u64, StoreError>;

    fn sum_calories(&self, filter: &WorkoutFilter) -> Result<f64, StoreError>;

    /// Calorie sums per group, in order of each group's first stored entry.
    fn sum_calories_by(
        &self,
        filter: &WorkoutFilter,
        group: GroupField,
    ) -> Result<Vec<(String, f64)>, StoreError>;
}
