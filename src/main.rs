use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use chrono::{Local, NaiveDate};
use clap::Parser as _;
use logging::{init_logging, Verbosity};
use session::Session;
use settings::{Settings, StorageFormat};

mod error;
mod logging;
mod parser;
mod processing;
mod session;
mod settings;
mod shell;
mod store;
mod workout;

/// Personal workout log kept in a flat file.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "workout-log", version, about)]
struct Cli {
    /// Configuration file (default: ./workout-log.toml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Data file, overriding the configuration
    #[arg(short, long, global = true, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Data file format, overriding the configuration
    #[arg(long, global = true, value_enum)]
    format: Option<StorageFormat>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// Record a workout
    Add {
        /// Day of the workout (default: today)
        #[arg(short, long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
        exercise_type: String,
        /// Duration in minutes
        duration: String,
        calories: String,
    },
    /// Show all workouts
    List,
    /// Delete a workout by its number in `list`
    Delete { number: usize },
    /// Delete all workouts
    Clear,
    /// Show totals and averages
    Stats,
    /// Start an interactive session
    Shell,
}

impl Cli {
    fn settings(&self) -> error::Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(file) = &self.file {
            settings.data_file = Some(file.clone());
        }
        Ok(settings)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("🛑 {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = cli.settings()?;
    let mut session = Session::start(&settings)?;
    let today = Local::now().date_naive();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Add {
            date,
            exercise_type,
            duration,
            calories,
        } => {
            let workout = session.submit_new_workout(
                date.unwrap_or(today),
                &exercise_type,
                &duration,
                &calories,
            )?;
            writeln!(stdout, "Workout added successfully! {workout}")?;
        }
        Command::List => shell::render_list(&session, &mut stdout)?,
        Command::Delete { number } => {
            let workout = session.delete_selected(number.checked_sub(1))?;
            writeln!(stdout, "Workout deleted successfully! {workout}")?;
        }
        Command::Clear => {
            session.clear_all()?;
            writeln!(stdout, "All workouts deleted!")?;
        }
        Command::Stats => writeln!(stdout, "{}", session.get_statistics())?,
        Command::Shell => {
            return Ok(shell::run(
                &mut session,
                io::stdin().lock(),
                &mut stdout,
                today,
            )?)
        }
    }

    // One-shot commands always persist, whatever the autosave setting.
    if session.has_unsaved_changes() {
        session.save()?;
    }

    Ok(())
}
