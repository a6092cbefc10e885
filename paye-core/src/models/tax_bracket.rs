use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single marginal band of a progressive tax schedule.
///
/// `rate` is a fraction (`0.07` for 7%). An `upper_bound` of `None` marks
/// the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        lower_bound: Decimal,
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(
        lower_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound: None,
            rate,
        }
    }

    /// Amount of income this bracket can absorb, or `None` for the top bracket.
    pub fn width(&self) -> Option<Decimal> {
        self.upper_bound.map(|upper| upper - self.lower_bound)
    }
}

impl fmt::Display for TaxBracket {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let percent = (self.rate * Decimal::ONE_HUNDRED).normalize();
        match self.upper_bound {
            Some(upper) => write!(f, "{} - {} @ {}%", self.lower_bound, upper, percent),
            None => write!(f, "{}+ @ {}%", self.lower_bound, percent),
        }
    }
}

/// Reasons a bracket table is rejected at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at 0, found {0}")]
    NonZeroStart(Decimal),

    #[error("bracket {index} has rate {rate}, expected a fraction between 0 and 1")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} has an upper bound that does not exceed its lower bound")]
    EmptyBand { index: usize },

    #[error("bracket {index} starts at {found}, expected {expected} (brackets must be ascending and contiguous)")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    #[error("last bracket must be unbounded")]
    BoundedTop,
}

/// A validated, ascending, contiguous set of brackets covering `[0, +inf)`.
///
/// The only way to obtain one is through [`BracketTable::new`] (or
/// deserialization, which goes through the same checks), so calculators can
/// rely on the coverage invariant without re-checking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates `brackets` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns the first [`BracketTableError`] found, checking brackets in
    /// order.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.lower_bound != Decimal::ZERO {
            return Err(BracketTableError::NonZeroStart(first.lower_bound));
        }

        let mut expected_lower = Decimal::ZERO;
        let last_index = brackets.len() - 1;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }

            if bracket.lower_bound != expected_lower {
                return Err(BracketTableError::NotContiguous {
                    index,
                    expected: expected_lower,
                    found: bracket.lower_bound,
                });
            }

            match bracket.upper_bound {
                Some(upper) if upper <= bracket.lower_bound => {
                    return Err(BracketTableError::EmptyBand { index });
                }
                Some(_) if index == last_index => return Err(BracketTableError::BoundedTop),
                Some(upper) => expected_lower = upper,
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedBeforeEnd { index });
                }
                None => {}
            }
        }

        tracing::trace!(brackets = brackets.len(), "bracket table validated");
        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false; a validated table holds at least one bracket.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Highest marginal rate in the table.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn two_band_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07)),
            TaxBracket::unbounded(dec!(300000), dec!(0.11)),
        ]
    }

    #[test]
    fn width_of_bounded_bracket() {
        let bracket = TaxBracket::bounded(dec!(600000), dec!(1100000), dec!(0.15));

        assert_eq!(bracket.width(), Some(dec!(500000)));
    }

    #[test]
    fn width_of_unbounded_bracket_is_none() {
        let bracket = TaxBracket::unbounded(dec!(3200000), dec!(0.24));

        assert_eq!(bracket.width(), None);
    }

    #[test]
    fn display_shows_percentage() {
        let bounded = TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07));
        let top = TaxBracket::unbounded(dec!(3200000), dec!(0.24));

        assert_eq!(bounded.to_string(), "0 - 300000 @ 7%");
        assert_eq!(top.to_string(), "3200000+ @ 24%");
    }

    #[test]
    fn new_accepts_valid_table() {
        let table = BracketTable::new(two_band_brackets()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.top_rate(), dec!(0.11));
    }

    #[test]
    fn new_accepts_single_unbounded_bracket() {
        let table = BracketTable::new(vec![TaxBracket::unbounded(dec!(0), dec!(0.10))]).unwrap();

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn new_rejects_empty_table() {
        assert_eq!(BracketTable::new(vec![]), Err(BracketTableError::Empty));
    }

    #[test]
    fn new_rejects_non_zero_start() {
        let result = BracketTable::new(vec![TaxBracket::unbounded(dec!(100), dec!(0.10))]);

        assert_eq!(result, Err(BracketTableError::NonZeroStart(dec!(100))));
    }

    #[test]
    fn new_rejects_gap() {
        let result = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07)),
            TaxBracket::unbounded(dec!(350000), dec!(0.11)),
        ]);

        assert_eq!(
            result,
            Err(BracketTableError::NotContiguous {
                index: 1,
                expected: dec!(300000),
                found: dec!(350000),
            })
        );
    }

    #[test]
    fn new_rejects_overlap() {
        let result = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07)),
            TaxBracket::unbounded(dec!(250000), dec!(0.11)),
        ]);

        assert!(matches!(
            result,
            Err(BracketTableError::NotContiguous { index: 1, .. })
        ));
    }

    #[test]
    fn new_rejects_descending_order() {
        let result = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0), dec!(600000), dec!(0.07)),
            TaxBracket::bounded(dec!(600000), dec!(300000), dec!(0.11)),
            TaxBracket::unbounded(dec!(300000), dec!(0.15)),
        ]);

        assert_eq!(result, Err(BracketTableError::EmptyBand { index: 1 }));
    }

    #[test]
    fn new_rejects_zero_width_band() {
        let result = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0), dec!(0), dec!(0.07)),
            TaxBracket::unbounded(dec!(0), dec!(0.11)),
        ]);

        assert_eq!(result, Err(BracketTableError::EmptyBand { index: 0 }));
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = BracketTable::new(vec![TaxBracket::unbounded(dec!(0), dec!(7))]);

        assert_eq!(
            result,
            Err(BracketTableError::RateOutOfRange {
                index: 0,
                rate: dec!(7),
            })
        );
    }

    #[test]
    fn new_rejects_negative_rate() {
        let result = BracketTable::new(vec![TaxBracket::unbounded(dec!(0), dec!(-0.01))]);

        assert!(matches!(
            result,
            Err(BracketTableError::RateOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn new_rejects_bounded_top() {
        let result = BracketTable::new(vec![TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07))]);

        assert_eq!(result, Err(BracketTableError::BoundedTop));
    }

    #[test]
    fn new_rejects_unbounded_in_the_middle() {
        let result = BracketTable::new(vec![
            TaxBracket::unbounded(dec!(0), dec!(0.07)),
            TaxBracket::unbounded(dec!(300000), dec!(0.11)),
        ]);

        assert_eq!(result, Err(BracketTableError::UnboundedBeforeEnd { index: 0 }));
    }

    #[test]
    fn top_rate_is_the_maximum_not_the_last() {
        let table = BracketTable::new(vec![
            TaxBracket::bounded(dec!(0), dec!(1000), dec!(0.30)),
            TaxBracket::unbounded(dec!(1000), dec!(0.20)),
        ])
        .unwrap();

        assert_eq!(table.top_rate(), dec!(0.30));
    }

    #[test]
    fn try_from_runs_validation() {
        let result = BracketTable::try_from(Vec::new());

        assert_eq!(result, Err(BracketTableError::Empty));
    }

    #[test]
    fn into_vec_returns_brackets_in_order() {
        let table = BracketTable::new(two_band_brackets()).unwrap();

        let brackets: Vec<TaxBracket> = table.into();

        assert_eq!(brackets, two_band_brackets());
    }
}
