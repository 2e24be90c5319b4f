//! The operations a front end drives: submit, list, delete, clear, and
//! statistics over one loaded collection.

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    error::{Error, Result},
    processing::Statistics,
    settings::Settings,
    store::WorkoutStore,
    workout::Workout,
};

#[derive(Debug)]
pub struct Session {
    store: WorkoutStore,
    autosave: bool,
    dirty: bool,
}

impl Session {
    pub fn start(settings: &Settings) -> Result<Self> {
        let store = WorkoutStore::open(settings.data_file(), settings.format)?;
        Ok(Self::new(store, settings.autosave))
    }

    pub fn new(store: WorkoutStore, autosave: bool) -> Self {
        Self {
            store,
            autosave,
            dirty: false,
        }
    }

    /// Validates form input and appends the workout. Rejected input leaves
    /// the collection untouched.
    pub fn submit_new_workout(
        &mut self,
        date: NaiveDate,
        exercise_type: &str,
        duration: &str,
        calories_burned: &str,
    ) -> Result<Workout> {
        let workout = Workout::from_input(date, exercise_type, duration, calories_burned)?;
        self.store.add(workout.clone());
        self.after_mutation()?;
        Ok(workout)
    }

    pub fn list_workouts(&self) -> &[Workout] {
        self.store.workouts()
    }

    /// Deletes the selected workout. `None` means nothing was selected.
    pub fn delete_selected(&mut self, index: Option<usize>) -> Result<Workout> {
        let index = index.ok_or(Error::NoSelection)?;
        let workout = self.store.delete(index)?;
        self.after_mutation()?;
        Ok(workout)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear();
        self.after_mutation()
    }

    pub fn get_statistics(&self) -> Statistics {
        self.store.stats()
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save()?;
        self.dirty = false;
        Ok(())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    // A failed autosave is reported to the caller but the change stays in
    // memory and the session stays dirty.
    fn after_mutation(&mut self) -> Result<()> {
        self.dirty = true;
        if self.autosave {
            self.save()
        } else {
            debug!("autosave off, change kept in memory");
            Ok(())
        }
    }
}
