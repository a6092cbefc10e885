//! Progressive (marginal-rate) income tax.
//!
//! Each bracket's rate applies only to the slice of income that falls inside
//! that bracket. Income is consumed bracket by bracket, lowest first, until
//! none is left; the unbounded top bracket absorbs whatever remains.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use paye_core::{BracketTable, ProgressiveTaxCalculator, TaxBracket};
//!
//! let table = BracketTable::new(vec![
//!     TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07)),
//!     TaxBracket::bounded(dec!(300000), dec!(600000), dec!(0.11)),
//!     TaxBracket::unbounded(dec!(600000), dec!(0.15)),
//! ])
//! .unwrap();
//!
//! let calculator = ProgressiveTaxCalculator::new(&table);
//!
//! // 300000 * 7% + 300000 * 11%
//! assert_eq!(calculator.compute_tax(dec!(600000)), dec!(54000));
//!
//! let breakdown = calculator.compute_breakdown(dec!(450000));
//! assert_eq!(breakdown.lines.len(), 2);
//! assert_eq!(breakdown.lines[1].taxable_amount, dec!(150000));
//! ```
//!
//! Negative income is clamped: it never enters a bracket and yields zero
//! tax. The result is exact; rounding for display is left to the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BracketTable, TaxBracket};

/// Tax attributed to one bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub bracket: TaxBracket,
    /// Portion of income taxed in this bracket.
    pub taxable_amount: Decimal,
    /// `taxable_amount * bracket.rate`.
    pub tax: Decimal,
}

/// Per-bracket view of a tax computation.
///
/// Only brackets that received income are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub taxable_income: Decimal,
    pub lines: Vec<BracketTax>,
    pub total_tax: Decimal,
}

impl TaxBreakdown {
    /// Total tax as a fraction of income; zero when there is no income.
    pub fn effective_rate(&self) -> Decimal {
        if self.taxable_income <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            self.total_tax / self.taxable_income
        }
    }
}

/// Applies a [`BracketTable`] to annual incomes.
///
/// Holds no state beyond the borrowed table, so one calculator can serve any
/// number of callers concurrently.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTaxCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a BracketTable {
        self.table
    }

    /// Total annual tax owed on `annual_income`.
    pub fn compute_tax(
        &self,
        annual_income: Decimal,
    ) -> Decimal {
        self.slices(annual_income).map(|slice| slice.tax).sum()
    }

    /// Same walk as [`compute_tax`](Self::compute_tax), keeping each bracket's share.
    pub fn compute_breakdown(
        &self,
        annual_income: Decimal,
    ) -> TaxBreakdown {
        let lines: Vec<BracketTax> = self.slices(annual_income).collect();
        let total_tax: Decimal = lines.iter().map(|line| line.tax).sum();

        tracing::debug!(
            income = %annual_income,
            brackets_used = lines.len(),
            total_tax = %total_tax,
            "computed progressive tax"
        );

        TaxBreakdown {
            taxable_income: annual_income,
            lines,
            total_tax,
        }
    }

    /// Rate applied to the last unit of `annual_income`.
    ///
    /// For non-positive income this is the first bracket's rate.
    pub fn marginal_rate(
        &self,
        annual_income: Decimal,
    ) -> Decimal {
        self.table
            .brackets()
            .iter()
            .find(|b| b.upper_bound.is_none_or(|upper| annual_income <= upper))
            .map_or(Decimal::ZERO, |b| b.rate)
    }

    /// Walks brackets in ascending order, stopping once income is used up.
    fn slices(
        &self,
        annual_income: Decimal,
    ) -> impl Iterator<Item = BracketTax> + 'a {
        self.table
            .brackets()
            .iter()
            .scan(annual_income, |remaining, bracket| {
                if *remaining <= Decimal::ZERO {
                    return None;
                }

                let taxable_amount = bracket
                    .width()
                    .map_or(*remaining, |width| (*remaining).min(width));
                *remaining -= taxable_amount;

                Some(BracketTax {
                    bracket: *bracket,
                    taxable_amount,
                    tax: taxable_amount * bracket.rate,
                })
            })
    }
}

/// Total tax on `annual_income` under `table`.
///
/// Shorthand for `ProgressiveTaxCalculator::new(table).compute_tax(annual_income)`.
pub fn compute_tax(
    annual_income: Decimal,
    table: &BracketTable,
) -> Decimal {
    ProgressiveTaxCalculator::new(table).compute_tax(annual_income)
}
