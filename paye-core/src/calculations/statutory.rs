//! Statutory deductions worksheet for a monthly salary.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Monthly gross (basic + transport + housing + other) |
//! | 2    | Employee pension: (basic + housing + transport) × employee rate, zero for contract staff |
//! | 3    | Employer pension: same base × employer rate, zero for contract staff |
//! | 4    | National Housing Fund: basic × NHF rate |
//! | 5    | Annual gross (Line 1 × 12) |
//! | 6    | Consolidated relief: max(relief floor, Line 5 × relief rate) + annual pension + annual NHF |
//! | 7    | Annual taxable income: Line 5 − Line 6, minimum 0 |
//! | 8    | Annual tax from the bracket table |
//! | 9    | Monthly tax (Line 8 ÷ 12) |
//! | 10   | Total monthly deductions (Line 2 + Line 4 + Line 9) |
//! | 11   | Monthly net pay (Line 1 − Line 10) |
//!
//! Amounts are kept exact; round with
//! [`round_half_up`](crate::calculations::common::round_half_up) for display.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use paye_core::calculations::{StatutoryInput, StatutoryWorksheet};
//! use paye_core::{BracketTable, StatutoryRates, TaxBracket};
//!
//! let table = BracketTable::new(vec![
//!     TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07)),
//!     TaxBracket::unbounded(dec!(300000), dec!(0.11)),
//! ])
//! .unwrap();
//! let rates = StatutoryRates::default();
//!
//! let input = StatutoryInput {
//!     basic_salary: dec!(20000),
//!     transport_allowance: dec!(0),
//!     housing_allowance: dec!(0),
//!     other_allowances: dec!(0),
//!     is_contract: false,
//! };
//!
//! let result = StatutoryWorksheet::new(&table, &rates).calculate(&input).unwrap();
//!
//! assert_eq!(result.annual_taxable_income, dec!(14800));
//! assert_eq!(result.annual_tax, dec!(1036));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{annualize, monthly, non_negative};
use crate::calculations::progressive::{ProgressiveTaxCalculator, TaxBreakdown};
use crate::{BracketTable, StatutoryRates};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatutoryError {
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{line} is too large to calculate")]
    Overflow { line: &'static str },
}

/// Monthly salary components fed into the worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryInput {
    pub basic_salary: Decimal,
    pub transport_allowance: Decimal,
    pub housing_allowance: Decimal,
    pub other_allowances: Decimal,
    /// Contract staff are exempt from pension contributions.
    pub is_contract: bool,
}

impl StatutoryInput {
    fn validate(&self) -> Result<(), StatutoryError> {
        let fields = [
            ("basic_salary", self.basic_salary),
            ("transport_allowance", self.transport_allowance),
            ("housing_allowance", self.housing_allowance),
            ("other_allowances", self.other_allowances),
        ];

        match fields.into_iter().find(|(_, value)| *value < Decimal::ZERO) {
            Some((field, value)) => Err(StatutoryError::NegativeAmount { field, value }),
            None => Ok(()),
        }
    }
}

/// Every line of the worksheet, monthly unless prefixed `annual_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryResult {
    pub monthly_basic: Decimal,
    pub monthly_transport: Decimal,
    pub monthly_housing: Decimal,
    pub monthly_other: Decimal,
    pub monthly_gross: Decimal,
    pub monthly_pension: Decimal,
    pub monthly_employer_pension: Decimal,
    pub monthly_nhf: Decimal,
    pub monthly_tax: Decimal,
    pub total_monthly_deductions: Decimal,
    pub monthly_net_pay: Decimal,
    pub annual_gross: Decimal,
    pub consolidated_relief: Decimal,
    pub annual_taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub is_contract: bool,
    pub is_pension_exempt: bool,
    /// Per-bracket detail behind `annual_tax`.
    pub tax_breakdown: TaxBreakdown,
}

/// Calculator for the statutory deductions worksheet.
#[derive(Debug, Clone, Copy)]
pub struct StatutoryWorksheet<'a> {
    calculator: ProgressiveTaxCalculator<'a>,
    rates: &'a StatutoryRates,
}

impl<'a> StatutoryWorksheet<'a> {
    pub fn new(
        table: &'a BracketTable,
        rates: &'a StatutoryRates,
    ) -> Self {
        Self {
            calculator: ProgressiveTaxCalculator::new(table),
            rates,
        }
    }

    /// Runs every worksheet line for one monthly salary.
    ///
    /// # Errors
    ///
    /// * [`StatutoryError::NegativeAmount`] if any salary component is negative.
    /// * [`StatutoryError::Overflow`] if a line exceeds the range of [`Decimal`].
    pub fn calculate(
        &self,
        input: &StatutoryInput,
    ) -> Result<StatutoryResult, StatutoryError> {
        input.validate()?;

        let monthly_gross = self.monthly_gross(input)?;

        let is_pension_exempt = input.is_contract;
        let pension_base = self.pension_base(input)?;
        let monthly_pension =
            self.pension(pension_base, self.rates.employee_pension_rate, is_pension_exempt)?;
        let monthly_employer_pension =
            self.pension(pension_base, self.rates.employer_pension_rate, is_pension_exempt)?;

        let monthly_nhf = self.nhf(input.basic_salary)?;

        let annual_gross = checked(annualize(monthly_gross), "annual gross")?;
        let consolidated_relief = self.consolidated_relief(
            annual_gross,
            checked(annualize(monthly_pension), "annual pension")?,
            checked(annualize(monthly_nhf), "annual NHF")?,
        )?;
        let annual_taxable_income = non_negative(annual_gross - consolidated_relief);

        let tax_breakdown = self.calculator.compute_breakdown(annual_taxable_income);
        let annual_tax = tax_breakdown.total_tax;
        let monthly_tax = monthly(annual_tax);

        let total_monthly_deductions = checked(
            monthly_pension
                .checked_add(monthly_nhf)
                .and_then(|sum| sum.checked_add(monthly_tax)),
            "total deductions",
        )?;
        let monthly_net_pay = monthly_gross - total_monthly_deductions;

        tracing::debug!(
            gross = %monthly_gross,
            taxable = %annual_taxable_income,
            annual_tax = %annual_tax,
            contract = input.is_contract,
            "statutory worksheet calculated"
        );

        Ok(StatutoryResult {
            monthly_basic: input.basic_salary,
            monthly_transport: input.transport_allowance,
            monthly_housing: input.housing_allowance,
            monthly_other: input.other_allowances,
            monthly_gross,
            monthly_pension,
            monthly_employer_pension,
            monthly_nhf,
            monthly_tax,
            total_monthly_deductions,
            monthly_net_pay,
            annual_gross,
            consolidated_relief,
            annual_taxable_income,
            annual_tax,
            is_contract: input.is_contract,
            is_pension_exempt,
            tax_breakdown,
        })
    }

    fn monthly_gross(
        &self,
        input: &StatutoryInput,
    ) -> Result<Decimal, StatutoryError> {
        let gross = input
            .basic_salary
            .checked_add(input.transport_allowance)
            .and_then(|sum| sum.checked_add(input.housing_allowance))
            .and_then(|sum| sum.checked_add(input.other_allowances));
        checked(gross, "monthly gross")
    }

    fn pension_base(
        &self,
        input: &StatutoryInput,
    ) -> Result<Decimal, StatutoryError> {
        let base = input
            .basic_salary
            .checked_add(input.housing_allowance)
            .and_then(|sum| sum.checked_add(input.transport_allowance));
        checked(base, "pension base")
    }

    fn pension(
        &self,
        base: Decimal,
        rate: Decimal,
        exempt: bool,
    ) -> Result<Decimal, StatutoryError> {
        if exempt {
            return Ok(Decimal::ZERO);
        }
        checked(base.checked_mul(rate), "pension")
    }

    fn nhf(
        &self,
        basic_salary: Decimal,
    ) -> Result<Decimal, StatutoryError> {
        checked(basic_salary.checked_mul(self.rates.nhf_rate), "NHF")
    }

    fn consolidated_relief(
        &self,
        annual_gross: Decimal,
        annual_pension: Decimal,
        annual_nhf: Decimal,
    ) -> Result<Decimal, StatutoryError> {
        let gross_share = checked(
            annual_gross.checked_mul(self.rates.relief_gross_rate),
            "consolidated relief",
        )?;
        let relief = self
            .rates
            .relief_floor
            .max(gross_share)
            .checked_add(annual_pension)
            .and_then(|sum| sum.checked_add(annual_nhf));
        checked(relief, "consolidated relief")
    }
}

fn checked(
    value: Option<Decimal>,
    line: &'static str,
) -> Result<Decimal, StatutoryError> {
    value.ok_or(StatutoryError::Overflow { line })
}
