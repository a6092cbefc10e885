use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::statutory::StatutoryInput;
use crate::models::statutory_rates::{RatesError, check_rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmploymentStatus {
    #[default]
    Active,
    OnLeave,
    Suspended,
    Terminated,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::OnLeave => "On Leave",
            Self::Suspended => "Suspended",
            Self::Terminated => "Terminated",
        }
    }

    /// Case-insensitive; accepts both "On Leave" and "OnLeave".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "").as_str() {
            "active" => Some(Self::Active),
            "onleave" => Some(Self::OnLeave),
            "suspended" => Some(Self::Suspended),
            "terminated" => Some(Self::Terminated),
            _ => None,
        }
    }
}

/// Default allowances applied when an employee record does not carry its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllowancePolicy {
    /// Housing allowance as a fraction of basic salary.
    pub housing_rate: Decimal,
    /// Transport allowance as a fraction of basic salary.
    pub transport_rate: Decimal,
}

impl AllowancePolicy {
    /// # Errors
    ///
    /// [`RatesError::RateOutOfRange`] if either rate is not in [0, 1].
    pub fn validate(&self) -> Result<(), RatesError> {
        check_rate("housing_rate", self.housing_rate)?;
        check_rate("transport_rate", self.transport_rate)
    }
}

impl Default for AllowancePolicy {
    fn default() -> Self {
        Self {
            housing_rate: Decimal::new(10, 2),
            transport_rate: Decimal::new(5, 2),
        }
    }
}

/// An employee as seen by a payroll run. Amounts are monthly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub basic_salary: Decimal,
    pub transport_allowance: Option<Decimal>,
    pub housing_allowance: Option<Decimal>,
    pub other_allowances: Decimal,
    pub is_contract: bool,
    pub status: EmploymentStatus,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }

    /// Builds worksheet input, filling missing allowances from `policy`.
    pub fn statutory_input(
        &self,
        policy: &AllowancePolicy,
    ) -> StatutoryInput {
        StatutoryInput {
            basic_salary: self.basic_salary,
            transport_allowance: self
                .transport_allowance
                .unwrap_or(self.basic_salary * policy.transport_rate),
            housing_allowance: self
                .housing_allowance
                .unwrap_or(self.basic_salary * policy.housing_rate),
            other_allowances: self.other_allowances,
            is_contract: self.is_contract,
        }
    }
}
