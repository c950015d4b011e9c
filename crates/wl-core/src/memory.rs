//! In-memory [`WorkoutStore`].
//!
//! Enforces the same uniqueness key as the SQLite store, which makes it a
//! faithful stand-in for tests and for callers without persistence.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::store::{GroupField, StoreError, WorkoutFilter, WorkoutStore};
use crate::types::{NewWorkout, OwnerId, WorkoutEntry};

#[derive(Debug, Clone)]
struct StoredWorkout {
    entry: WorkoutEntry,
    day: NaiveDate,
}

type UniqueKey = (OwnerId, String, String, NaiveDate);

/// A `Vec`-backed store. IDs start at 1 and increase with insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<StoredWorkout>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn matching<'a>(
        &'a self,
        filter: &'a WorkoutFilter,
    ) -> impl Iterator<Item = &'a StoredWorkout> + 'a {
        self.rows.iter().filter(move |row| filter.matches(&row.entry))
    }
}

fn unique_key(owner_id: &OwnerId, category: &str, name: &str, day: NaiveDate) -> UniqueKey {
    (owner_id.clone(), category.to_string(), name.to_string(), day)
}

impl WorkoutStore for MemoryStore {
    fn insert_all(&mut self, workouts: &[NewWorkout]) -> Result<Vec<i64>, StoreError> {
        let mut seen: HashSet<UniqueKey> = self
            .rows
            .iter()
            .map(|row| {
                unique_key(
                    &row.entry.owner_id,
                    &row.entry.category,
                    &row.entry.workout_name,
                    row.day,
                )
            })
            .collect();
        for workout in workouts {
            let key = unique_key(
                &workout.owner_id,
                &workout.category,
                &workout.workout_name,
                workout.day,
            );
            if !seen.insert(key) {
                return Err(StoreError::Conflict);
            }
        }

        let mut ids = Vec::with_capacity(workouts.len());
        for workout in workouts {
            self.next_id += 1;
            let id = self.next_id;
            self.rows.push(StoredWorkout {
                entry: workout.clone().into_entry(id),
                day: workout.day,
            });
            ids.push(id);
        }
        Ok(ids)
    }

    fn find_one(&self, filter: &WorkoutFilter) -> Result<Option<WorkoutEntry>, StoreError> {
        Ok(self.find_many(filter)?.into_iter().next())
    }

    fn find_many(&self, filter: &WorkoutFilter) -> Result<Vec<WorkoutEntry>, StoreError> {
        let mut entries: Vec<WorkoutEntry> =
            self.matching(filter).map(|row| row.entry.clone()).collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    fn count(&self, filter: &WorkoutFilter) -> Result<u64, StoreError> {
        Ok(self.matching(filter).count() as u64)
    }

    fn sum_calories(&self, filter: &WorkoutFilter) -> Result<f64, StoreError> {
        Ok(self.matching(filter).map(|row| row.entry.calories_burned).sum())
    }

    fn sum_calories_by(
        &self,
        filter: &WorkoutFilter,
        group: GroupField,
    ) -> Result<Vec<(String, f64)>, StoreError> {
        let mut sums: Vec<(String, f64)> = Vec::new();
        for row in self.matching(filter) {
            let label = match group {
                GroupField::Category => row.entry.category.clone(),
            };
            match sums.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, total)) => *total += row.entry.calories_burned,
                None => sums.push((label, row.entry.calories_burned)),
            }
        }
        Ok(sums)
    }
}
