use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub date: NaiveDate,
    pub exercise_type: String,
    pub duration_minutes: u32,
    pub calories_burned: u32,
}

impl Workout {
    pub fn new(
        date: NaiveDate,
        exercise_type: impl Into<String>,
        duration_minutes: u32,
        calories_burned: u32,
    ) -> Self {
        Self {
            date,
            exercise_type: exercise_type.into(),
            duration_minutes,
            calories_burned,
        }
    }

    /// Builds a workout from raw form input.
    ///
    /// The exercise type must contain something other than whitespace, and
    /// both numbers must be plain decimal digits with a value above zero.
    pub fn from_input(
        date: NaiveDate,
        exercise_type: &str,
        duration: &str,
        calories_burned: &str,
    ) -> Result<Self> {
        let exercise_type = exercise_type.trim();
        if exercise_type.is_empty() {
            return Err(Error::validation("exercise type", "must not be empty"));
        }

        let duration_minutes = parse_positive("duration", duration)?;
        let calories_burned = parse_positive("calories burned", calories_burned)?;

        Ok(Self::new(date, exercise_type, duration_minutes, calories_burned))
    }
}

fn parse_positive(field: &'static str, input: &str) -> Result<u32> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            field,
            format!("'{input}' is not a whole number"),
        ));
    }

    match input.parse::<u32>() {
        Ok(0) => Err(Error::validation(field, "must be greater than zero")),
        Ok(value) => Ok(value),
        Err(_) => Err(Error::validation(field, format!("'{input}' is too large"))),
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} min | {} cal",
            self.date, self.exercise_type, self.duration_minutes, self.calories_burned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_from_input_valid() {
        let workout = Workout::from_input(date(), "Running", "30", "200").unwrap();
        assert_eq!(workout, Workout::new(date(), "Running", 30, 200));
    }

    #[test]
    fn test_from_input_trims_exercise_type() {
        let workout = Workout::from_input(date(), "  Yoga ", "45", "120").unwrap();
        assert_eq!(workout.exercise_type, "Yoga");
    }

    #[test]
    fn test_from_input_empty_exercise_type() {
        let err = Workout::from_input(date(), "   ", "30", "200").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("exercise type"));
    }

    #[test]
    fn test_from_input_non_numeric_duration() {
        let err = Workout::from_input(date(), "Running", "abc", "200").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn test_from_input_rejects_signs_and_spaces() {
        for input in ["-5", "+5", " 5", "5.0", ""] {
            let result = Workout::from_input(date(), "Running", input, "200");
            assert!(result.is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_from_input_zero_calories() {
        let err = Workout::from_input(date(), "Running", "30", "0").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_from_input_overflow() {
        let err = Workout::from_input(date(), "Running", "99999999999", "10").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_display() {
        let workout = Workout::new(date(), "Cycling", 60, 450);
        assert_eq!(workout.to_string(), "2024-05-01 | Cycling | 60 min | 450 cal");
    }
}
