use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgeError {
    #[error("date of birth {0} must be in the past")]
    NotInPast(NaiveDate),

    #[error("employee is {age}, must be at least {minimum} years old")]
    Underage { age: i32, minimum: i32 },
}

/// Whole years between `birth_date` and `on`.
///
/// A birthday that has not yet come round in `on`'s year does not count.
pub fn calculate_age(
    birth_date: NaiveDate,
    on: NaiveDate,
) -> i32 {
    let before_birthday = (on.month(), on.day()) < (birth_date.month(), birth_date.day());
    on.year() - birth_date.year() - i32::from(before_birthday)
}

/// Checks a date of birth for a new employee record.
pub fn validate_birth_date(
    birth_date: NaiveDate,
    on: NaiveDate,
    minimum_age: i32,
) -> Result<i32, AgeError> {
    if birth_date >= on {
        return Err(AgeError::NotInPast(birth_date));
    }

    let age = calculate_age(birth_date, on);
    if age < minimum_age {
        return Err(AgeError::Underage {
            age,
            minimum: minimum_age,
        });
    }

    Ok(age)
}
