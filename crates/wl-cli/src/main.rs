use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{add, check, dashboard, read_input, resolve_owner, workouts};
use wl_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(wl_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = wl_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

/// IANA name of the machine's timezone, for display only.
fn local_timezone_name() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|err| {
        tracing::debug!(%err, "could not resolve timezone name");
        "local time".to_string()
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();
    let now = Utc::now();

    match &cli.command {
        Some(Commands::Add(args)) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let owner = resolve_owner(args.owner.id.as_deref(), &config)?;
            let raw = read_input(args.file.as_deref())?;
            add::run(&mut stdout, &mut db, &owner, &raw, now, &Local, args.json)?;
        }
        Some(Commands::Check(args)) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let owner = resolve_owner(args.owner.id.as_deref(), &config)?;
            let raw = read_input(args.file.as_deref())?;
            check::run(&mut stdout, &db, &owner, &raw, now, &Local, args.json)?;
        }
        Some(Commands::Dashboard { owner, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let owner = resolve_owner(owner.id.as_deref(), &config)?;
            let timezone = local_timezone_name();
            dashboard::run(&mut stdout, &db, &owner, now, &Local, &timezone, *json)?;
        }
        Some(Commands::Workouts { owner, date, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let owner = resolve_owner(owner.id.as_deref(), &config)?;
            workouts::run(&mut stdout, &db, &owner, *date, now, &Local, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
