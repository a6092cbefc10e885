use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configured rate or amount outside its valid range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatesError {
    #[error("{name} {value} must be between 0 and 1")]
    RateOutOfRange { name: &'static str, value: Decimal },

    #[error("relief floor {0} cannot be negative")]
    NegativeReliefFloor(Decimal),
}

/// Checks `value` is a fraction in `[0, 1]`.
pub(crate) fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), RatesError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RatesError::RateOutOfRange { name, value });
    }
    Ok(())
}

/// Contribution rates and relief parameters for the statutory deductions
/// worksheet. All rates are fractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatutoryRates {
    /// Employee pension contribution, applied to basic + housing + transport.
    pub employee_pension_rate: Decimal,
    /// Employer pension contribution on the same base.
    pub employer_pension_rate: Decimal,
    /// National Housing Fund contribution, applied to basic salary.
    pub nhf_rate: Decimal,
    /// Minimum annual relief before pension and NHF are added.
    pub relief_floor: Decimal,
    /// Share of annual gross used when it exceeds `relief_floor`.
    pub relief_gross_rate: Decimal,
}

impl Default for StatutoryRates {
    fn default() -> Self {
        Self {
            employee_pension_rate: Decimal::new(8, 2),
            employer_pension_rate: Decimal::new(10, 2),
            nhf_rate: Decimal::new(25, 3),
            relief_floor: Decimal::new(200_000, 0),
            relief_gross_rate: Decimal::new(1, 2),
        }
    }
}

impl StatutoryRates {
    /// Validates the configured values.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError`] if:
    /// - any rate is not in [0, 1]
    /// - `relief_floor` is negative
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use paye_core::{RatesError, StatutoryRates};
    ///
    /// let rates = StatutoryRates {
    ///     employee_pension_rate: dec!(-0.5),
    ///     ..StatutoryRates::default()
    /// };
    ///
    /// assert_eq!(
    ///     rates.validate(),
    ///     Err(RatesError::RateOutOfRange { name: "employee_pension_rate", value: dec!(-0.5) })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), RatesError> {
        check_rate("employee_pension_rate", self.employee_pension_rate)?;
        check_rate("employer_pension_rate", self.employer_pension_rate)?;
        check_rate("nhf_rate", self.nhf_rate)?;
        check_rate("relief_gross_rate", self.relief_gross_rate)?;
        if self.relief_floor < Decimal::ZERO {
            return Err(RatesError::NegativeReliefFloor(self.relief_floor));
        }
        Ok(())
    }
}
