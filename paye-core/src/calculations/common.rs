//! Common helpers shared by the payroll calculations.

use rust_decimal::Decimal;

/// Number of pay periods in a year.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use paye_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use paye_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-5.00)), dec!(0));
/// assert_eq!(non_negative(dec!(5.00)), dec!(5.00));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Spreads an annual amount over twelve months.
pub fn monthly(annual: Decimal) -> Decimal {
    annual / MONTHS_PER_YEAR
}

/// Scales a monthly amount to a year, or `None` if the result would not fit
/// in a [`Decimal`].
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use paye_core::calculations::common::annualize;
///
/// assert_eq!(annualize(dec!(62500)), Some(dec!(750000)));
/// assert_eq!(annualize(Decimal::MAX), None);
/// ```
pub fn annualize(monthly: Decimal) -> Option<Decimal> {
    monthly.checked_mul(MONTHS_PER_YEAR)
}
