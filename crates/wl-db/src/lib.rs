//! Storage layer for the workout log.
//!
//! Provides persistence for workout entries using `rusqlite`, implementing
//! [`WorkoutStore`] from `wl-core`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! `date` is stored as TEXT in ISO 8601 UTC with milliseconds
//! (e.g., `2025-01-29T10:30:00.000Z`). Every value has the same shape, so
//! lexicographic ordering matches chronological ordering and range filters
//! can compare text.
//!
//! ## Uniqueness
//!
//! `day` holds the calendar day (`YYYY-MM-DD`) of `date` in the reference
//! timezone, computed by the writer. A unique index on
//! `(owner_id, category, workout_name, day)` backs up the duplicate check
//! done before each write, so two racing submissions cannot both land.
//!
//! The index assumes every writer uses the same reference timezone. Reads
//! never use `day`: today's totals, the weekly series and the duplicate
//! check all filter on `date` within a day window.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params, params_from_iter};
use thiserror::Error;
use wl_core::{GroupField, NewWorkout, OwnerId, StoreError, WorkoutEntry, WorkoutFilter, WorkoutStore};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// An insert hit the one-per-day unique index.
    #[error("workout already exists for that day")]
    UniqueViolation,
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for workout {workout_id}: {timestamp}")]
    TimestampParse {
        workout_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row breaks a domain invariant.
    #[error("invalid workout row {workout_id}: {message}")]
    InvalidRow { workout_id: i64, message: String },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation => Self::Conflict,
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A workout row as stored, before domain conversion.
#[derive(Debug)]
struct WorkoutRow {
    id: i64,
    owner_id: String,
    category: String,
    workout_name: String,
    sets: u32,
    reps: u32,
    weight_kg: f64,
    duration_min: f64,
    calories_burned: f64,
    date: String,
}

impl WorkoutRow {
    fn into_entry(self) -> Result<WorkoutEntry, DbError> {
        let owner_id = OwnerId::new(self.owner_id).map_err(|e| DbError::InvalidRow {
            workout_id: self.id,
            message: e.to_string(),
        })?;
        Ok(WorkoutEntry {
            id: self.id,
            owner_id,
            date: parse_timestamp(&self.date, self.id)?,
            category: self.category,
            workout_name: self.workout_name,
            sets: self.sets,
            reps: self.reps,
            weight_kg: self.weight_kg,
            duration_min: self.duration_min,
            calories_burned: self.calories_burned,
        })
    }
}

const WORKOUT_COLUMNS: &str = "id, owner_id, category, workout_name, sets, reps, weight_kg, duration_min, calories_burned, date";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- date: ISO 8601 UTC with millis (e.g., '2025-01-29T10:30:00.000Z')
            -- day: calendar day of date in the reference timezone ('YYYY-MM-DD')
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id TEXT NOT NULL,
                category TEXT NOT NULL,
                workout_name TEXT NOT NULL,
                sets INTEGER NOT NULL CHECK (sets > 0),
                reps INTEGER NOT NULL CHECK (reps > 0),
                weight_kg REAL NOT NULL CHECK (weight_kg >= 0),
                duration_min REAL NOT NULL CHECK (duration_min >= 0),
                calories_burned REAL NOT NULL,
                date TEXT NOT NULL,
                day TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_workouts_owner_day_name
                ON workouts(owner_id, category, workout_name, day);
            CREATE INDEX IF NOT EXISTS idx_workouts_owner_date ON workouts(owner_id, date);
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of workouts in one transaction.
    ///
    /// Any failure, including a unique-index hit, rolls back the whole batch.
    pub fn insert_workouts(&mut self, workouts: &[NewWorkout]) -> Result<Vec<i64>, DbError> {
        if workouts.is_empty() {
            return Ok(Vec::new());
        }
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(workouts.len());
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO workouts
                (owner_id, category, workout_name, sets, reps, weight_kg, duration_min, calories_burned, date, day)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for workout in workouts {
                stmt.execute(params![
                    workout.owner_id.as_str(),
                    workout.category,
                    workout.workout_name,
                    workout.sets,
                    workout.reps,
                    workout.weight_kg,
                    workout.duration_min,
                    workout.calories_burned,
                    format_timestamp(workout.date),
                    format_day(workout),
                ])
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        DbError::UniqueViolation
                    } else {
                        DbError::Sqlite(e)
                    }
                })?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        tracing::debug!(count = ids.len(), "inserted workouts");
        Ok(ids)
    }

    /// Lists workouts matching the filter ordered by date then ID.
    pub fn list_workouts(
        &self,
        filter: &WorkoutFilter,
        limit: Option<usize>,
    ) -> Result<Vec<WorkoutEntry>, DbError> {
        let (clause, args) = where_clause(filter);
        let mut sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE {clause} ORDER BY date ASC, id ASC"
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args), |row| {
            Ok(WorkoutRow {
                id: row.get(0)?,
                owner_id: row.get(1)?,
                category: row.get(2)?,
                workout_name: row.get(3)?,
                sets: row.get(4)?,
                reps: row.get(5)?,
                weight_kg: row.get(6)?,
                duration_min: row.get(7)?,
                calories_burned: row.get(8)?,
                date: row.get(9)?,
            })
        })?;
        let mut workouts = Vec::new();
        for row in rows {
            workouts.push(row?.into_entry()?);
        }
        Ok(workouts)
    }

    /// Counts workouts matching the filter.
    pub fn count_workouts(&self, filter: &WorkoutFilter) -> Result<u64, DbError> {
        let (clause, args) = where_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM workouts WHERE {clause}"),
            params_from_iter(args),
            |row| row.get(0),
        )?;
        Ok(count.unsigned_abs())
    }

    /// Total calories of workouts matching the filter; `0.0` when none match.
    pub fn total_calories(&self, filter: &WorkoutFilter) -> Result<f64, DbError> {
        let (clause, args) = where_clause(filter);
        let total = self.conn.query_row(
            &format!("SELECT TOTAL(calories_burned) FROM workouts WHERE {clause}"),
            params_from_iter(args),
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Calorie totals per group, ordered by each group's earliest row.
    pub fn total_calories_by(
        &self,
        filter: &WorkoutFilter,
        group: GroupField,
    ) -> Result<Vec<(String, f64)>, DbError> {
        let column = match group {
            GroupField::Category => "category",
        };
        let (clause, args) = where_clause(filter);
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {column}, TOTAL(calories_burned)
            FROM workouts
            WHERE {clause}
            GROUP BY {column}
            ORDER BY MIN(id) ASC
            "
        ))?;
        let rows = stmt.query_map(params_from_iter(args), |row| {
            let label: String = row.get(0)?;
            let total: f64 = row.get(1)?;
            Ok((label, total))
        })?;
        let mut totals = Vec::new();
        for row in rows {
            totals.push(row?);
        }
        Ok(totals)
    }
}

impl WorkoutStore for Database {
    fn insert_all(&mut self, workouts: &[NewWorkout]) -> Result<Vec<i64>, StoreError> {
        Ok(self.insert_workouts(workouts)?)
    }

    fn find_one(&self, filter: &WorkoutFilter) -> Result<Option<WorkoutEntry>, StoreError> {
        Ok(self.list_workouts(filter, Some(1))?.into_iter().next())
    }

    fn find_many(&self, filter: &WorkoutFilter) -> Result<Vec<WorkoutEntry>, StoreError> {
        Ok(self.list_workouts(filter, None)?)
    }

    fn count(&self, filter: &WorkoutFilter) -> Result<u64, StoreError> {
        Ok(self.count_workouts(filter)?)
    }

    fn sum_calories(&self, filter: &WorkoutFilter) -> Result<f64, StoreError> {
        Ok(self.total_calories(filter)?)
    }

    fn sum_calories_by(
        &self,
        filter: &WorkoutFilter,
        group: GroupField,
    ) -> Result<Vec<(String, f64)>, StoreError> {
        Ok(self.total_calories_by(filter, group)?)
    }
}

/// Builds a `WHERE` body and its positional arguments. Every argument is text.
fn where_clause(filter: &WorkoutFilter) -> (String, Vec<String>) {
    let mut clauses = vec!["owner_id = ?"];
    let mut args = vec![filter.owner_id.to_string()];
    if let Some(category) = &filter.category {
        clauses.push("category = ?");
        args.push(category.clone());
    }
    if let Some(name) = &filter.workout_name {
        clauses.push("workout_name = ?");
        args.push(name.clone());
    }
    if let Some(range) = filter.range {
        clauses.push("date >= ?");
        args.push(format_timestamp(range.start));
        clauses.push("date < ?");
        args.push(format_timestamp(range.end));
    }
    (clauses.join(" AND "), args)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    err.sqlite_error()
        .is_some_and(|e| e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

fn parse_timestamp(timestamp: &str, workout_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            workout_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_day(workout: &NewWorkout) -> String {
    workout.day.format("%Y-%m-%d").to_string()
}
