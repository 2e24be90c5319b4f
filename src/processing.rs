use std::fmt;

use crate::workout::Workout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub count: usize,
    pub total_duration: u64,
    pub total_calories: u64,
    /// Whole minutes, rounded down.
    pub average_duration: u64,
}

pub fn calc_statistics(workouts: &[Workout]) -> Statistics {
    let (total_duration, total_calories) =
        workouts.iter().fold((0u64, 0u64), |(duration, calories), workout| {
            (
                duration + u64::from(workout.duration_minutes),
                calories + u64::from(workout.calories_burned),
            )
        });

    let count = workouts.len();
    let average_duration = match u64::try_from(count) {
        Ok(n) if n > 0 => total_duration / n,
        _ => 0,
    };

    Statistics {
        count,
        total_duration,
        total_calories,
        average_duration,
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Workouts: {} | Total Duration: {} min | Avg Duration: {} min | Total Calories: {} cal",
            self.count, self.total_duration, self.average_duration, self.total_calories
        )
    }
}
