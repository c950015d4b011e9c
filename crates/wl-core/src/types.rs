//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calories::estimate_calories;

/// Validation errors for values that parsed but are not acceptable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A count that must be positive was zero or negative.
    #[error("entry {}: {field} must be greater than zero, got {value}", .block_index + 1)]
    NotPositive {
        block_index: usize,
        field: &'static str,
        value: i64,
    },

    /// A measurement that must not be negative was negative.
    #[error("entry {}: {field} cannot be negative, got {value}", .block_index + 1)]
    Negative {
        block_index: usize,
        field: &'static str,
        value: f64,
    },

    /// A measurement was NaN or infinite.
    #[error("entry {}: {field} must be a finite number", .block_index + 1)]
    NotFinite {
        block_index: usize,
        field: &'static str,
    },

    /// A count does not fit the stored integer width.
    #[error("entry {}: {field} is too large, got {value}", .block_index + 1)]
    OutOfRange {
        block_index: usize,
        field: &'static str,
        value: i64,
    },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// Opaque identifier of the user who owns a workout.
    OwnerId,
    "owner_id"
);

/// A workout as read from one block of submitted text.
///
/// Counts and measurements are kept exactly as parsed so that
/// [`EntryDraft::validate`] can report out-of-range values with context.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    /// Position of the source block among the non-empty blocks of the input.
    pub block_index: usize,
    pub category: String,
    pub workout_name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight_kg: f64,
    pub duration_min: f64,
}

impl EntryDraft {
    /// Checks the semantic invariants the grammar cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let block_index = self.block_index;
        for (field, value) in [("sets", self.sets), ("reps", self.reps)] {
            if value <= 0 {
                return Err(ValidationError::NotPositive {
                    block_index,
                    field,
                    value,
                });
            }
            if u32::try_from(value).is_err() {
                return Err(ValidationError::OutOfRange {
                    block_index,
                    field,
                    value,
                });
            }
        }
        for (field, value) in [("weight", self.weight_kg), ("duration", self.duration_min)] {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { block_index, field });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative {
                    block_index,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A validated workout ready to be written to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub owner_id: OwnerId,
    pub category: String,
    pub workout_name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight_kg: f64,
    pub duration_min: f64,
    pub calories_burned: f64,
    /// Instant the workout was logged.
    pub date: DateTime<Utc>,
    /// Calendar day of `date` in the reference timezone.
    pub day: NaiveDate,
}

impl NewWorkout {
    /// Validates a draft and derives the stored fields.
    ///
    /// `calories_burned` is always computed here from the validated weight
    /// and duration; nothing in the submitted text can set it.
    pub fn from_draft(
        owner_id: &OwnerId,
        draft: EntryDraft,
        date: DateTime<Utc>,
        day: NaiveDate,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;
        let count = |field: &'static str, value: i64| {
            u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
                block_index: draft.block_index,
                field,
                value,
            })
        };
        let sets = count("sets", draft.sets)?;
        let reps = count("reps", draft.reps)?;
        Ok(Self {
            owner_id: owner_id.clone(),
            calories_burned: estimate_calories(draft.weight_kg, draft.duration_min),
            category: draft.category,
            workout_name: draft.workout_name,
            sets,
            reps,
            weight_kg: draft.weight_kg,
            duration_min: draft.duration_min,
            date,
            day,
        })
    }

    /// Attaches the store-assigned ID, producing the stored form.
    pub fn into_entry(self, id: i64) -> WorkoutEntry {
        WorkoutEntry {
            id,
            owner_id: self.owner_id,
            category: self.category,
            workout_name: self.workout_name,
            sets: self.sets,
            reps: self.reps,
            weight_kg: self.weight_kg,
            duration_min: self.duration_min,
            calories_burned: self.calories_burned,
            date: self.date,
        }
    }
}

/// One logged workout as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub id: i64,
    pub owner_id: OwnerId,
    pub category: String,
    pub workout_name: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    #[serde(rename = "duration")]
    pub duration_min: f64,
    pub calories_burned: f64,
    pub date: DateTime<Utc>,
}
