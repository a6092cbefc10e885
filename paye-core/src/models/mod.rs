mod employee;
mod salary_structure;
mod statutory_rates;
mod tax_bracket;

pub use employee::{AllowancePolicy, Employee, EmploymentStatus};
pub use salary_structure::{SalaryStructure, SalaryStructureError};
pub use statutory_rates::{RatesError, StatutoryRates};
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
