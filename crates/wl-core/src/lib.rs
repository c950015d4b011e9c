//! Core domain logic for the workout log.
//!
//! This crate contains the fundamental types and logic for:
//! - Parsing: turning submitted workout text into validated drafts
//! - Ingestion: duplicate checks, calorie estimation and atomic writes
//! - Aggregation: today's totals, category breakdown and the 7-day series
//!
//! Storage is abstracted behind [`WorkoutStore`]; [`MemoryStore`] is the
//! in-process implementation.

pub mod aggregate;
pub mod calories;
pub mod guard;
pub mod ingest;
mod memory;
pub mod parser;
pub mod store;
pub mod types;
pub mod window;

pub use aggregate::{
    CategorySlice, DashboardSummary, DayWorkouts, WeeklyCalories, build_dashboard,
    list_workouts_for_day,
};
pub use calories::estimate_calories;
pub use guard::{DuplicateError, check_duplicate, find_duplicates};
pub use ingest::{IngestError, check_submission, prepare_drafts, submit_workouts};
pub use memory::MemoryStore;
pub use parser::{ParseError, ParseErrorKind, parse};
pub use store::{GroupField, StoreError, WorkoutFilter, WorkoutStore};
pub use types::{EntryDraft, NewWorkout, OwnerId, ValidationError, WorkoutEntry};
pub use window::{DayWindow, TimeRange};
