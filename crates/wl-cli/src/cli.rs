//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Workout log.
///
/// Records workouts written in a short text format, estimates calories and
/// summarizes the day and the week.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log workouts read from a file or stdin.
    ///
    /// Blocks are separated by `;`, each one shaped like:
    /// `#chest` / `-bench press` / `-5 setsX15 reps` / `-30 kg` / `-30 min`.
    Add(SubmissionArgs),

    /// Report which workouts in the text were already logged today.
    Check(SubmissionArgs),

    /// Show today's totals, category breakdown and the last 7 days.
    Dashboard {
        #[command(flatten)]
        owner: OwnerArg,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the workouts logged on one day.
    Workouts {
        #[command(flatten)]
        owner: OwnerArg,

        /// Day to list (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Owner override shared by every subcommand.
#[derive(Debug, Args)]
pub struct OwnerArg {
    /// Owner to act for; defaults to `owner` from the config.
    #[arg(long = "owner")]
    pub id: Option<String>,
}

/// Arguments for commands that read workout text.
#[derive(Debug, Args)]
pub struct SubmissionArgs {
    #[command(flatten)]
    pub owner: OwnerArg,

    /// Read workout text from this file instead of stdin.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
