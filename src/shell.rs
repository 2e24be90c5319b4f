//! Interactive session over one in-memory collection.
//!
//! The view (list plus statistics) is redrawn from the current snapshot
//! after every change.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use tracing::debug;

use crate::{parser::DATE_FORMAT, session::Session};

const HELP: &str = "\
Commands:
  add <date|today> <duration> <calories> <exercise type...>
  list
  delete <number>
  clear
  stats
  save
  help
  quit";

const ADD_USAGE: &str = "usage: add <date|today> <duration> <calories> <exercise type...>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Add {
        date: NaiveDate,
        duration: String,
        calories: String,
        exercise_type: String,
    },
    List,
    Delete(Option<usize>),
    Clear,
    Stats,
    Save,
    Help,
    Quit,
    Empty,
}

/// Splits off the first word of `text`, returning it and the untouched rest.
fn next_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(text.split_once(char::is_whitespace).unwrap_or((text, "")))
}

fn parse_command(line: &str, today: NaiveDate) -> Result<ShellCommand, String> {
    let Some((name, rest)) = next_word(line) else {
        return Ok(ShellCommand::Empty);
    };

    match name {
        "add" => {
            let Some((date, rest)) = next_word(rest) else {
                return Err(ADD_USAGE.to_string());
            };
            let Some((duration, rest)) = next_word(rest) else {
                return Err(ADD_USAGE.to_string());
            };
            let Some((calories, exercise_type)) = next_word(rest) else {
                return Err(ADD_USAGE.to_string());
            };

            let date = if date == "today" {
                today
            } else {
                NaiveDate::parse_from_str(date, DATE_FORMAT)
                    .map_err(|_| format!("invalid date '{date}', expected YYYY-MM-DD"))?
            };

            Ok(ShellCommand::Add {
                date,
                duration: duration.to_string(),
                calories: calories.to_string(),
                exercise_type: exercise_type.trim().to_string(),
            })
        }
        "delete" => match next_word(rest) {
            None => Ok(ShellCommand::Delete(None)),
            Some((number, _)) => number
                .parse::<usize>()
                .map(|number| ShellCommand::Delete(number.checked_sub(1)))
                .map_err(|_| format!("invalid workout number '{number}'")),
        },
        "list" => Ok(ShellCommand::List),
        "clear" => Ok(ShellCommand::Clear),
        "stats" => Ok(ShellCommand::Stats),
        "save" => Ok(ShellCommand::Save),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}', type 'help'")),
    }
}

pub fn render_list(session: &Session, out: &mut impl Write) -> io::Result<()> {
    let workouts = session.list_workouts();
    if workouts.is_empty() {
        return writeln!(out, "No workouts recorded yet.");
    }

    for (i, workout) in workouts.iter().enumerate() {
        writeln!(out, "{:>3}. {workout}", i + 1)?;
    }

    Ok(())
}

fn render_view(session: &Session, out: &mut impl Write) -> io::Result<()> {
    render_list(session, out)?;
    writeln!(out, "{}", session.get_statistics())
}

/// Runs commands from `input` until `quit` or end of input.
///
/// `today` is the date used for `add today ...`. Unsaved changes are
/// reported on every way out, including a failed read.
pub fn run(
    session: &mut Session,
    input: impl BufRead,
    out: &mut impl Write,
    today: NaiveDate,
) -> io::Result<()> {
    writeln!(
        out,
        "Workout log: {}. Type 'help' for commands.",
        session.store().path().display()
    )?;
    render_view(session, out)?;

    let result = run_commands(session, input, out, today);

    if session.has_unsaved_changes() {
        writeln!(out, "Warning: unsaved changes were discarded.")?;
    }

    result
}

fn run_commands(
    session: &mut Session,
    mut input: impl BufRead,
    out: &mut impl Write,
    today: NaiveDate,
) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            writeln!(out, "🛑 input is not valid UTF-8, line ignored")?;
            continue;
        };

        let command = match parse_command(line, today) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "🛑 {message}")?;
                continue;
            }
        };
        debug!(?command, "shell command");

        let result = match command {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => return Ok(()),
            ShellCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ShellCommand::List => {
                render_list(session, out)?;
                continue;
            }
            ShellCommand::Stats => {
                writeln!(out, "{}", session.get_statistics())?;
                continue;
            }
            ShellCommand::Save => session
                .save()
                .map(|()| "Workouts saved successfully!"),
            ShellCommand::Add {
                date,
                duration,
                calories,
                exercise_type,
            } => session
                .submit_new_workout(date, &exercise_type, &duration, &calories)
                .map(|_| "Workout added successfully!"),
            ShellCommand::Delete(index) => session
                .delete_selected(index)
                .map(|_| "Workout deleted successfully!"),
            ShellCommand::Clear => session.clear_all().map(|()| "All workouts deleted!"),
        };

        match result {
            Ok(message) => {
                writeln!(out, "{message}")?;
                render_view(session, out)?;
            }
            Err(err) => writeln!(out, "🛑 {err}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::settings::{Settings, StorageFormat};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn create_test_session(autosave: bool) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_file: Some(dir.path().join("workouts.txt")),
            format: StorageFormat::Text,
            autosave,
        };
        let session = Session::start(&settings).unwrap();
        (dir, session)
    }

    fn run_script(session: &mut Session, script: &str) -> String {
        run_bytes(session, script.as_bytes())
    }

    fn run_bytes(session: &mut Session, script: &[u8]) -> String {
        let mut out = Vec::new();
        run(session, script, &mut out, today()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse_command("add today 30 200 Trail running", today()),
            Ok(ShellCommand::Add {
                date: today(),
                duration: "30".to_string(),
                calories: "200".to_string(),
                exercise_type: "Trail running".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_add_keeps_inner_spacing() {
        let Ok(ShellCommand::Add { exercise_type, .. }) =
            parse_command("add today 30 200  Trail  running \r\n", today())
        else {
            panic!("expected add");
        };
        assert_eq!(exercise_type, "Trail  running");
    }

    #[test]
    fn test_parse_add_missing_fields() {
        assert!(parse_command("add 2024-01-01 30", today())
            .unwrap_err()
            .starts_with("usage"));
    }

    #[test]
    fn test_parse_add_bad_date() {
        assert!(parse_command("add 1/2/24 30 200 Run", today())
            .unwrap_err()
            .contains("invalid date"));
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse_command("delete 2", today()),
            Ok(ShellCommand::Delete(Some(1)))
        );
        assert_eq!(
            parse_command("delete", today()),
            Ok(ShellCommand::Delete(None))
        );
        assert_eq!(
            parse_command("delete 0", today()),
            Ok(ShellCommand::Delete(None))
        );
        assert!(parse_command("delete two", today()).is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("   ", today()), Ok(ShellCommand::Empty));
        assert_eq!(parse_command("exit", today()), Ok(ShellCommand::Quit));
        assert!(parse_command("dance", today()).is_err());
    }

    #[test]
    fn test_session_add_and_delete() {
        let (_dir, mut session) = create_test_session(true);
        let output = run_script(
            &mut session,
            "add today 30 200 Running\nadd 2024-06-16 20 150 Yoga\ndelete 1\nquit\n",
        );

        assert!(output.contains("Workout added successfully!"));
        assert!(output.contains("Workout deleted successfully!"));
        assert!(output.contains("  1. 2024-06-16 | Yoga | 20 min | 150 cal"));
        assert_eq!(
            fs::read_to_string(session.store().path()).unwrap(),
            "2024-06-16,Yoga,20,150\n"
        );
    }

    #[test]
    fn test_session_errors_are_inline() {
        let (_dir, mut session) = create_test_session(true);
        let output = run_script(&mut session, "add today abc 200 Running\ndelete 5\nstats\n");

        assert!(output.contains("🛑 invalid duration"));
        assert!(output.contains("🛑 no workout at position 5"));
        assert!(output.contains("Workouts: 0 |"));
        assert!(session.list_workouts().is_empty());
    }

    #[test]
    fn test_view_redrawn_after_clear() {
        let (_dir, mut session) = create_test_session(true);
        let output = run_script(&mut session, "add today 30 200 Running\nclear\n");

        let after_clear = output.split("All workouts deleted!").nth(1).unwrap();
        assert!(after_clear.contains("No workouts recorded yet."));
        assert!(after_clear.contains("Workouts: 0 |"));
    }

    #[test]
    fn test_manual_save_and_discard_warning() {
        let (_dir, mut session) = create_test_session(false);
        let output = run_script(&mut session, "add today 30 200 Running\nquit\n");
        assert!(output.contains("unsaved changes were discarded"));
        assert!(!session.store().path().exists());

        let output = run_script(&mut session, "save\nquit\n");
        assert!(output.contains("Workouts saved successfully!"));
        assert!(!output.contains("discarded"));
        assert!(session.store().path().exists());
    }

    #[test]
    fn test_invalid_utf8_line_is_reported_inline() {
        let (_dir, mut session) = create_test_session(false);
        let output = run_bytes(
            &mut session,
            b"add today 30 200 Run\n\xff\nlist\nquit\n",
        );

        assert!(output.contains("🛑 input is not valid UTF-8"));
        assert!(output.contains("  1. 2024-06-15 | Run | 30 min | 200 cal"));
        assert!(output.contains("unsaved changes were discarded"));
        assert_eq!(session.list_workouts().len(), 1);
    }
}
