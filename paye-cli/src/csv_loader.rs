//! CSV loader for payroll employee data.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive and must match exactly.
//!
//! | Column                | Required | Type    | Notes                                          |
//! |-----------------------|----------|---------|------------------------------------------------|
//! | `employee_id`         | yes      | string  |                                                |
//! | `name`                | yes      | string  |                                                |
//! | `basic_salary`        | yes      | decimal | monthly                                        |
//! | `transport_allowance` | no       | decimal | empty means the policy default (5% of basic)   |
//! | `housing_allowance`   | no       | decimal | empty means the policy default (10% of basic)  |
//! | `other_allowances`    | no       | decimal | empty means 0                                  |
//! | `is_contract`         | no       | bool    | `true` / `false`, empty means `false`          |
//! | `employment_status`   | no       | string  | `Active`, `On Leave`, `Suspended`, `Terminated` |
//!
//! ### Minimal example
//!
//! ```csv
//! employee_id,name,basic_salary
//! EMP001,Ada Obi,250000
//! ```
use paye_core::{Employee, EmploymentStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    employee_id: String,
    name: String,
    basic_salary: Decimal,
    transport_allowance: Option<Decimal>,
    housing_allowance: Option<Decimal>,
    other_allowances: Option<Decimal>,
    is_contract: Option<bool>,
    employment_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading employee CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based (header = row 0).
    #[error("unrecognised employment status '{status}' on row {row}")]
    InvalidEmploymentStatus { status: String, row: usize },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Employee, CsvLoadError> {
    let status = match row.employment_status {
        Some(s) if !s.trim().is_empty() => EmploymentStatus::parse(&s)
            .ok_or(CsvLoadError::InvalidEmploymentStatus {
                status: s,
                row: row_number,
            })?,
        _ => EmploymentStatus::default(),
    };

    Ok(Employee {
        employee_id: row.employee_id,
        name: row.name,
        basic_salary: row.basic_salary,
        transport_allowance: row.transport_allowance,
        housing_allowance: row.housing_allowance,
        other_allowances: row.other_allowances.unwrap_or(Decimal::ZERO),
        is_contract: row.is_contract.unwrap_or(false),
        status,
    })
}

/// Parse CSV text and return the employees in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] if the CSV is structurally invalid or a required
///   field cannot be deserialised.
/// * [CsvLoadError::InvalidEmploymentStatus] if any row has an unknown status.
pub fn load_from_str(input: &str) -> Result<Vec<Employee>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<Employee>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let employees = load_from_str(&contents)?;
    tracing::info!(path = %path.display(), employees = employees.len(), "employees loaded");
    Ok(employees)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
