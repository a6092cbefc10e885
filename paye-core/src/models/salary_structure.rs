use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::statutory::StatutoryInput;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalaryStructureError {
    #[error("{component} percentage {value} must be between 0 and 100")]
    PercentageOutOfRange {
        component: &'static str,
        value: Decimal,
    },

    #[error("component percentages add up to {0}, expected 100")]
    TotalNot100(Decimal),
}

/// How a monthly gross salary is divided into components, in percent.
///
/// Every component is within `[0, 100]` and together they add up to exactly
/// 100. Deserialising goes through the same checks as [`SalaryStructure::new`].
///
/// ```
/// use rust_decimal_macros::dec;
/// use paye_core::SalaryStructure;
///
/// let structure = SalaryStructure::new(
///     "Standard", dec!(40), dec!(15), dec!(25), dec!(10), dec!(5), dec!(5),
/// )
/// .unwrap();
///
/// let input = structure.split(dec!(200000), false);
/// assert_eq!(input.basic_salary, dec!(80000));
/// assert_eq!(input.other_allowances, dec!(40000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SalaryStructureFields")]
pub struct SalaryStructure {
    name: String,
    basic_percentage: Decimal,
    transport_percentage: Decimal,
    housing_percentage: Decimal,
    utility_percentage: Decimal,
    meal_percentage: Decimal,
    clothing_percentage: Decimal,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SalaryStructureFields {
    name: String,
    basic_percentage: Decimal,
    transport_percentage: Decimal,
    housing_percentage: Decimal,
    #[serde(default)]
    utility_percentage: Decimal,
    #[serde(default)]
    meal_percentage: Decimal,
    #[serde(default)]
    clothing_percentage: Decimal,
}

impl TryFrom<SalaryStructureFields> for SalaryStructure {
    type Error = SalaryStructureError;

    fn try_from(fields: SalaryStructureFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.name,
            fields.basic_percentage,
            fields.transport_percentage,
            fields.housing_percentage,
            fields.utility_percentage,
            fields.meal_percentage,
            fields.clothing_percentage,
        )
    }
}

impl SalaryStructure {
    /// # Errors
    ///
    /// * [`SalaryStructureError::PercentageOutOfRange`] if a component is
    ///   outside `[0, 100]`.
    /// * [`SalaryStructureError::TotalNot100`] if the components do not add
    ///   up to 100.
    pub fn new(
        name: impl Into<String>,
        basic_percentage: Decimal,
        transport_percentage: Decimal,
        housing_percentage: Decimal,
        utility_percentage: Decimal,
        meal_percentage: Decimal,
        clothing_percentage: Decimal,
    ) -> Result<Self, SalaryStructureError> {
        let components = [
            ("basic", basic_percentage),
            ("transport", transport_percentage),
            ("housing", housing_percentage),
            ("utility", utility_percentage),
            ("meal", meal_percentage),
            ("clothing", clothing_percentage),
        ];

        for (component, value) in components {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(SalaryStructureError::PercentageOutOfRange { component, value });
            }
        }

        let total: Decimal = components.iter().map(|(_, value)| value).sum();
        if total != Decimal::ONE_HUNDRED {
            return Err(SalaryStructureError::TotalNot100(total));
        }

        Ok(Self {
            name: name.into(),
            basic_percentage,
            transport_percentage,
            housing_percentage,
            utility_percentage,
            meal_percentage,
            clothing_percentage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn basic_percentage(&self) -> Decimal {
        self.basic_percentage
    }

    pub fn transport_percentage(&self) -> Decimal {
        self.transport_percentage
    }

    pub fn housing_percentage(&self) -> Decimal {
        self.housing_percentage
    }

    /// Utility, meal and clothing together.
    pub fn other_percentage(&self) -> Decimal {
        self.utility_percentage + self.meal_percentage + self.clothing_percentage
    }

    /// Splits a monthly gross into worksheet input. Utility, meal and
    /// clothing are folded into `other_allowances`.
    pub fn split(
        &self,
        monthly_gross: Decimal,
        is_contract: bool,
    ) -> StatutoryInput {
        let share = |pct: Decimal| monthly_gross * (pct / Decimal::ONE_HUNDRED);

        StatutoryInput {
            basic_salary: share(self.basic_percentage),
            transport_allowance: share(self.transport_percentage),
            housing_allowance: share(self.housing_percentage),
            other_allowances: share(self.other_percentage()),
            is_contract,
        }
    }
}
