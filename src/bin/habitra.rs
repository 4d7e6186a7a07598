//! Habitra CLI - Command-line interface for the habit engine
//!
//! Commands:
//! - list: Show the habit collection with streaks
//! - add: Create a new habit
//! - toggle: Toggle completion for a day
//! - progress: Daily completion aggregate
//! - reorder: Move a habit within the collection
//! - reset: Restore the seed collection
//! - doctor: Diagnose the persisted store

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use habitra_core::storage::{FileStorage, PersistedStore, STORE_KEY, STORE_VERSION};
use habitra_core::types::AddHabitPayload;
use habitra_core::{date, feedback, streak, ENGINE_VERSION};

/// Habitra - on-device habit completion and streak engine
#[derive(Parser)]
#[command(name = "habitra")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Track habit completions, streaks, and daily progress", long_about = None)]
struct Cli {
    /// Directory holding the persisted habit store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the habit collection with streaks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new habit
    Add {
        /// Display name
        title: String,

        /// Accent color (hex)
        #[arg(long, default_value = "#8b5cf6")]
        color: String,
    },

    /// Toggle a habit's completion for a day
    Toggle {
        /// Habit id (see `habitra list`)
        id: String,

        /// Target day as YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<String>,

        /// Output the transition as JSON
        #[arg(long)]
        json: bool,
    },

    /// Daily completion aggregate
    Progress {
        /// Target day as YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a habit within the collection
    Reorder {
        /// Current position (0-based)
        from: usize,

        /// Target position (0-based)
        to: usize,
    },

    /// Replace the collection with the default seed set
    Reset,

    /// Diagnose the persisted store
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HabitraCliError> {
    let data_dir = resolve_data_dir(cli.data_dir);
    let mut store = PersistedStore::open(FileStorage::new(&data_dir));

    match cli.command {
        Commands::List { json } => cmd_list(&store, json),
        Commands::Add { title, color } => cmd_add(&mut store, title, color),
        Commands::Toggle { id, date, json } => cmd_toggle(&mut store, &id, date.as_deref(), json),
        Commands::Progress { date, json } => cmd_progress(&store, date.as_deref(), json),
        Commands::Reorder { from, to } => cmd_reorder(&mut store, from, to),
        Commands::Reset => cmd_reset(&mut store),
        Commands::Doctor { json } => cmd_doctor(&data_dir, json),
    }
}

/// Default to the platform data directory so the CLI and an embedded shell
/// on the same device share one store.
fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        dirs::data_dir()
            .map(|dir| dir.join("habitra"))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn cmd_list(store: &PersistedStore<FileStorage>, json: bool) -> Result<(), HabitraCliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(store.habits())?);
        return Ok(());
    }

    let today = date::today();
    for (index, habit) in store.habits().iter().enumerate() {
        let mark = if streak::is_completed_on(habit, today) {
            "x"
        } else {
            " "
        };
        let current = streak::current_streak(&habit.completed_dates, today);
        println!(
            "{index:>2} [{mark}] {:<24} {:<18} streak {}",
            habit.title, habit.id, current
        );
    }
    Ok(())
}

fn cmd_add(
    store: &mut PersistedStore<FileStorage>,
    title: String,
    color: String,
) -> Result<(), HabitraCliError> {
    let id = store.add_habit(AddHabitPayload { title, color });
    println!("Added habit {id}");
    Ok(())
}

fn cmd_toggle(
    store: &mut PersistedStore<FileStorage>,
    id: &str,
    day: Option<&str>,
    json: bool,
) -> Result<(), HabitraCliError> {
    let day = day.map(date::parse_day).transpose()?;

    let transition = store
        .toggle_completion(id, day)
        .ok_or_else(|| HabitraCliError::UnknownHabit(id.to_string()))?;

    if json {
        println!("{}", serde_json::to_string(&transition)?);
        return Ok(());
    }

    let target = date::format_day(day.unwrap_or_else(date::today));
    if transition.is_completed {
        println!(
            "Marked {} complete for {} (streak {})",
            transition.habit_id, target, transition.new_streak
        );
    } else {
        println!("Marked {} incomplete for {}", transition.habit_id, target);
    }

    for pulse in feedback::pulses_for(&transition) {
        if pulse == feedback::HapticPulse::Milestone {
            println!("Milestone: {} days in a row!", transition.new_streak);
        }
    }
    Ok(())
}

fn cmd_progress(
    store: &PersistedStore<FileStorage>,
    day: Option<&str>,
    json: bool,
) -> Result<(), HabitraCliError> {
    let day = day.map(date::parse_day).transpose()?;
    let progress = store.daily_progress(day);

    if json {
        println!("{}", serde_json::to_string(&progress)?);
    } else {
        println!(
            "{}/{} habits complete ({:.0}%)",
            progress.completed,
            progress.total,
            progress.percent * 100.0
        );
    }
    Ok(())
}

fn cmd_reorder(
    store: &mut PersistedStore<FileStorage>,
    from: usize,
    to: usize,
) -> Result<(), HabitraCliError> {
    if store.reorder_habits(from, to) {
        println!("Moved habit from {from} to {to}");
    } else {
        println!("No change (indices equal or out of bounds)");
    }
    Ok(())
}

fn cmd_reset(store: &mut PersistedStore<FileStorage>) -> Result<(), HabitraCliError> {
    store.reset();
    println!("Store reset to the seed collection");
    Ok(())
}

fn cmd_doctor(data_dir: &Path, json: bool) -> Result<(), HabitraCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Habitra Core {}", ENGINE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "store_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Stored schema: {} v{}", STORE_KEY, STORE_VERSION),
    });

    let blob_path = data_dir.join(format!("{STORE_KEY}.json"));
    if blob_path.exists() {
        match std::fs::read_to_string(&blob_path) {
            Ok(payload) => match habitra_core::storage::decode(&payload) {
                Ok(habits) => checks.push(DoctorCheck {
                    name: "store_blob".to_string(),
                    status: CheckStatus::Ok,
                    message: format!("Blob valid ({} habits)", habits.len()),
                }),
                Err(e) => checks.push(DoctorCheck {
                    name: "store_blob".to_string(),
                    status: CheckStatus::Warning,
                    message: format!("Blob unreadable, next open will seed: {e}"),
                }),
            },
            Err(e) => checks.push(DoctorCheck {
                name: "store_blob".to_string(),
                status: CheckStatus::Error,
                message: format!("Cannot read blob: {e}"),
            }),
        }
    } else {
        checks.push(DoctorCheck {
            name: "store_blob".to_string(),
            status: CheckStatus::Warning,
            message: format!("No blob at {}, first open will seed", blob_path.display()),
        });
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: "habitra-core".to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Habitra Doctor Report");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(HabitraCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum HabitraCliError {
    Io(io::Error),
    Store(habitra_core::StoreError),
    Json(serde_json::Error),
    UnknownHabit(String),
    DoctorFailed,
}

impl From<io::Error> for HabitraCliError {
    fn from(e: io::Error) -> Self {
        HabitraCliError::Io(e)
    }
}

impl From<habitra_core::StoreError> for HabitraCliError {
    fn from(e: habitra_core::StoreError) -> Self {
        HabitraCliError::Store(e)
    }
}

impl From<serde_json::Error> for HabitraCliError {
    fn from(e: serde_json::Error) -> Self {
        HabitraCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HabitraCliError> for CliError {
    fn from(e: HabitraCliError) -> Self {
        match e {
            HabitraCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the data directory path and permissions".to_string()),
            },
            HabitraCliError::Store(e) => CliError {
                code: "STORE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Dates must be YYYY-MM-DD".to_string()),
            },
            HabitraCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            HabitraCliError::UnknownHabit(id) => CliError {
                code: "UNKNOWN_HABIT".to_string(),
                message: format!("No habit with id {id}"),
                hint: Some("Run 'habitra list' to see habit ids".to_string()),
            },
            HabitraCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
