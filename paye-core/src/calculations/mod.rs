//! Payroll calculations.
//!
//! Everything here is a pure function of its inputs: bracket tables and
//! rates are passed in by the caller, never read from globals.

pub mod age;
pub mod common;
pub mod payroll;
pub mod progressive;
pub mod proration;
pub mod statutory;

pub use age::{AgeError, calculate_age, validate_birth_date};
pub use payroll::{PayrollError, PayrollItem, PayrollPeriod, PayrollRun, PayrollStatus, PayrollTotals};
pub use progressive::{BracketTax, ProgressiveTaxCalculator, TaxBreakdown, compute_tax};
pub use proration::{ProrationError, prorate_amount};
pub use statutory::{StatutoryError, StatutoryInput, StatutoryResult, StatutoryWorksheet};
