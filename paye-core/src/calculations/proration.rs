use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProrationError {
    #[error("invalid month {month} for year {year}")]
    InvalidMonth { month: u32, year: i32 },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("amount {0} is too large to prorate")]
    Overflow(Decimal),
}

/// Share of a monthly `amount` earned over the days of `[start, end]` that
/// fall within `month` of `year`. Both ends are inclusive.
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use paye_core::calculations::prorate_amount;
///
/// let start = NaiveDate::from_ymd_opt(2024, 4, 16).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
///
/// // 15 of April's 30 days
/// assert_eq!(prorate_amount(dec!(300000), start, end, 4, 2024).unwrap(), dec!(150000));
/// ```
pub fn prorate_amount(
    amount: Decimal,
    start: NaiveDate,
    end: NaiveDate,
    month: u32,
    year: i32,
) -> Result<Decimal, ProrationError> {
    if end < start {
        return Err(ProrationError::EndBeforeStart { start, end });
    }

    let (first, last) = month_bounds(month, year).ok_or(ProrationError::InvalidMonth { month, year })?;
    let days_in_month = last.day();

    let from = start.max(first);
    let to = end.min(last);
    if to < from {
        return Ok(Decimal::ZERO);
    }

    let days_worked = (to - from).num_days() + 1;
    tracing::trace!(days_worked, days_in_month, "prorating amount");

    let earned = amount
        .checked_mul(Decimal::from(days_worked))
        .ok_or(ProrationError::Overflow(amount))?;
    Ok(earned / Decimal::from(days_in_month))
}

fn month_bounds(
    month: u32,
    year: i32,
) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}
