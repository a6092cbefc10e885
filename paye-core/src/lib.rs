pub mod calculations;
pub mod models;

pub use calculations::{
    AgeError, BracketTax, PayrollError, PayrollItem, PayrollPeriod, PayrollRun, PayrollStatus,
    PayrollTotals, ProgressiveTaxCalculator, ProrationError, StatutoryError, StatutoryInput,
    StatutoryResult, StatutoryWorksheet, TaxBreakdown, calculate_age, compute_tax, prorate_amount,
    validate_birth_date,
};
pub use models::*;
