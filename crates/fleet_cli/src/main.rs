//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `fleet_core` linkage.
//! - Optionally open a database file and report how many vehicles it holds.
//! - Route core diagnostics to rolling log files when a log directory is set.
//!
//! Usage: `fleet_cli [DB_PATH] [LOG_DIR]`
//!
//! `LOG_DIR` falls back to `FLEET_LOG_DIR`; relative paths resolve against the
//! working directory. Without either, core events are discarded.

use fleet_core::db::open_db;
use fleet_core::{SqliteVehicleRepository, VehicleRepository};
use std::path::PathBuf;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "FLEET_LOG_DIR";

fn main() -> ExitCode {
    println!("fleet_core ping={}", fleet_core::ping());
    println!("fleet_core version={}", fleet_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let log_dir = resolve_log_dir(args.next(), std::env::var(LOG_DIR_ENV).ok());

    let outcome = run(&db_path, log_dir);
    fleet_core::flush_logging();

    match outcome {
        Ok(count) => {
            println!("fleet_core vehicles={count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("fleet_core error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str, log_dir: Option<PathBuf>) -> Result<u64, Box<dyn std::error::Error>> {
    if let Some(dir) = log_dir {
        let dir = std::path::absolute(&dir)?;
        fleet_core::init_logging(fleet_core::default_log_level(), &dir.to_string_lossy())?;
    }

    let conn = open_db(db_path)?;
    let repo = SqliteVehicleRepository::try_new(&conn)?;
    Ok(repo.count_vehicles()?)
}

/// Positional argument wins over the environment; blank values count as unset.
fn resolve_log_dir(arg: Option<String>, env: Option<String>) -> Option<PathBuf> {
    arg.into_iter()
        .chain(env)
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
