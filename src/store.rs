//! Flat-file persistence for the workout collection.
//!
//! The whole file is read when the store opens and rewritten in place on
//! every save. There is no temporary file or lock.

use std::{
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    parser::{Parser, CSV_HEADER, DATE_FORMAT},
    processing::{calc_statistics, Statistics},
    settings::StorageFormat,
    workout::Workout,
};

#[derive(Debug)]
pub struct WorkoutStore {
    path: PathBuf,
    format: StorageFormat,
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    /// Opens the store and loads its file. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>, format: StorageFormat) -> Result<Self> {
        let path = path.into();
        let workouts = Self::load(&path, format)?;
        Ok(Self {
            path,
            format,
            workouts,
        })
    }

    pub fn load(path: &Path, format: StorageFormat) -> Result<Vec<Workout>> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "data file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(Error::StorageRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let workouts = Parser::new(source.chars().collect(), format)
            .parse_file()
            .map_err(|source| Error::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), count = workouts.len(), "loaded workouts");

        Ok(workouts)
    }

    /// Overwrites the data file with the full collection.
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, render(&self.workouts, self.format)).map_err(|source| {
            Error::StorageWrite {
                path: self.path.clone(),
                source,
            }
        })?;
        info!(path = %self.path.display(), count = self.workouts.len(), "saved workouts");

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn add(&mut self, workout: Workout) {
        debug!(%workout, "adding workout");
        self.workouts.push(workout);
    }

    /// Removes and returns the workout at `index`.
    pub fn delete(&mut self, index: usize) -> Result<Workout> {
        if index >= self.workouts.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.workouts.len(),
            });
        }

        let workout = self.workouts.remove(index);
        debug!(index, %workout, "deleted workout");
        Ok(workout)
    }

    pub fn clear(&mut self) {
        debug!(count = self.workouts.len(), "clearing workouts");
        self.workouts.clear();
    }

    pub fn stats(&self) -> Statistics {
        calc_statistics(&self.workouts)
    }
}

pub fn render(workouts: &[Workout], format: StorageFormat) -> String {
    let mut out = String::new();

    match format {
        StorageFormat::Text => {
            for workout in workouts {
                if workout.exercise_type.contains([',', '\n', '\r']) {
                    warn!(
                        exercise_type = %workout.exercise_type,
                        "exercise type contains a delimiter, this record will not load back"
                    );
                }
                // Writing to a String cannot fail.
                let _ = writeln!(
                    out,
                    "{},{},{},{}",
                    workout.date.format(DATE_FORMAT),
                    workout.exercise_type,
                    workout.duration_minutes,
                    workout.calories_burned
                );
            }
        }
        StorageFormat::Csv => {
            out.push_str(&CSV_HEADER.join(","));
            out.push('\n');
            for workout in workouts {
                let _ = writeln!(
                    out,
                    "{},{},{},{}",
                    workout.date.format(DATE_FORMAT),
                    quote_csv(&workout.exercise_type),
                    workout.duration_minutes,
                    workout.calories_burned
                );
            }
        }
    }

    out
}

fn quote_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
