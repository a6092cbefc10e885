//! Payroll runs.
//!
//! A run covers one pay period and moves through a small lifecycle:
//!
//! ```text
//! Draft ──process──▶ Completed
//!   │
//!   └────cancel────▶ Cancelled
//! ```
//!
//! Processing computes a [`PayrollItem`] for every active employee and sums
//! the run totals. It is all-or-nothing: if any employee fails the worksheet,
//! the run stays in `Draft` with no items.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::statutory::{StatutoryError, StatutoryResult, StatutoryWorksheet};
use crate::{AllowancePolicy, Employee};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollError {
    #[error("period end {end} is before period start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("payment date {payment_date} is before period end {end}")]
    PaymentBeforeEnd { end: NaiveDate, payment_date: NaiveDate },

    #[error("payroll is {0}, only draft payrolls can be changed")]
    NotDraft(PayrollStatus),

    #[error("employee {employee_id}: {source}")]
    Employee {
        employee_id: String,
        #[source]
        source: StatutoryError,
    },

    #[error("payroll totals are too large to sum")]
    TotalsOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PayrollStatus {
    #[default]
    Draft,
    Completed,
    Cancelled,
}

impl PayrollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dates bounding a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    start: NaiveDate,
    end: NaiveDate,
    payment_date: NaiveDate,
}

impl PayrollPeriod {
    /// # Errors
    ///
    /// The end must not precede the start, and payment must not precede the end.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        payment_date: NaiveDate,
    ) -> Result<Self, PayrollError> {
        if end < start {
            return Err(PayrollError::EndBeforeStart { start, end });
        }
        if payment_date < end {
            return Err(PayrollError::PaymentBeforeEnd { end, payment_date });
        }
        Ok(Self {
            start,
            end,
            payment_date,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }
}

/// One employee's line in a processed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollItem {
    pub employee_id: String,
    pub name: String,
    pub result: StatutoryResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    pub employees: usize,
    pub total_basic_salary: Decimal,
    pub total_allowances: Decimal,
    /// Pension and NHF; tax is reported separately.
    pub total_deductions: Decimal,
    pub total_tax: Decimal,
    pub total_net_pay: Decimal,
}

impl PayrollTotals {
    fn add(
        &mut self,
        result: &StatutoryResult,
    ) -> Option<()> {
        let allowances = result
            .monthly_transport
            .checked_add(result.monthly_housing)?
            .checked_add(result.monthly_other)?;
        let deductions = result.monthly_pension.checked_add(result.monthly_nhf)?;

        self.employees += 1;
        self.total_basic_salary = self.total_basic_salary.checked_add(result.monthly_basic)?;
        self.total_allowances = self.total_allowances.checked_add(allowances)?;
        self.total_deductions = self.total_deductions.checked_add(deductions)?;
        self.total_tax = self.total_tax.checked_add(result.monthly_tax)?;
        self.total_net_pay = self.total_net_pay.checked_add(result.monthly_net_pay)?;
        Some(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    name: String,
    period: PayrollPeriod,
    status: PayrollStatus,
    items: Vec<PayrollItem>,
    totals: PayrollTotals,
}

impl PayrollRun {
    /// A new run in `Draft`.
    pub fn new(
        name: impl Into<String>,
        period: PayrollPeriod,
    ) -> Self {
        Self {
            name: name.into(),
            period,
            status: PayrollStatus::Draft,
            items: Vec::new(),
            totals: PayrollTotals::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> &PayrollPeriod {
        &self.period
    }

    pub fn status(&self) -> PayrollStatus {
        self.status
    }

    pub fn items(&self) -> &[PayrollItem] {
        &self.items
    }

    pub fn totals(&self) -> &PayrollTotals {
        &self.totals
    }

    /// Computes pay for every active employee and completes the run.
    ///
    /// # Errors
    ///
    /// * [`PayrollError::NotDraft`] if the run was already processed or cancelled.
    /// * [`PayrollError::Employee`] if any employee's worksheet fails; the
    ///   run is left untouched.
    /// * [`PayrollError::TotalsOverflow`] if the run totals do not fit in a
    ///   [`Decimal`].
    pub fn process(
        &mut self,
        employees: &[Employee],
        worksheet: &StatutoryWorksheet<'_>,
        policy: &AllowancePolicy,
    ) -> Result<&PayrollTotals, PayrollError> {
        self.ensure_draft()?;

        let items = employees
            .iter()
            .filter(|e| e.is_active())
            .map(|employee| {
                worksheet
                    .calculate(&employee.statutory_input(policy))
                    .map(|result| PayrollItem {
                        employee_id: employee.employee_id.clone(),
                        name: employee.name.clone(),
                        result,
                    })
                    .map_err(|source| PayrollError::Employee {
                        employee_id: employee.employee_id.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut totals = PayrollTotals::default();
        for item in &items {
            totals.add(&item.result).ok_or(PayrollError::TotalsOverflow)?;
        }

        let skipped = employees.len() - items.len();
        tracing::info!(
            payroll = %self.name,
            processed = items.len(),
            skipped,
            "payroll processed"
        );

        self.items = items;
        self.totals = totals;
        self.status = PayrollStatus::Completed;
        Ok(&self.totals)
    }

    /// # Errors
    ///
    /// Only draft runs can be cancelled.
    pub fn cancel(&mut self) -> Result<(), PayrollError> {
        self.ensure_draft()?;
        self.status = PayrollStatus::Cancelled;
        Ok(())
    }

    fn ensure_draft(&self) -> Result<(), PayrollError> {
        match self.status {
            PayrollStatus::Draft => Ok(()),
            other => Err(PayrollError::NotDraft(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;
    use crate::{BracketTable, EmploymentStatus, StatutoryRates, TaxBracket};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paye_table() -> BracketTable {
        BracketTable::new(vec![
            TaxBracket::bounded(dec!(0), dec!(300000), dec!(0.07)),
            TaxBracket::bounded(dec!(300000), dec!(600000), dec!(0.11)),
            TaxBracket::bounded(dec!(600000), dec!(1100000), dec!(0.15)),
            TaxBracket::bounded(dec!(1100000), dec!(1600000), dec!(0.19)),
            TaxBracket::bounded(dec!(1600000), dec!(3200000), dec!(0.21)),
            TaxBracket::unbounded(dec!(3200000), dec!(0.24)),
        ])
        .unwrap()
    }

    fn period() -> PayrollPeriod {
        PayrollPeriod::new(date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31)).unwrap()
    }

    fn employee(id: &str, basic: Decimal, status: EmploymentStatus) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: format!("Employee {id}"),
            basic_salary: basic,
            transport_allowance: None,
            housing_allowance: None,
            other_allowances: dec!(0),
            is_contract: false,
            status,
        }
    }

    // =========================================================================
    // PayrollPeriod tests
    // =========================================================================

    #[test]
    fn period_rejects_end_before_start() {
        let result = PayrollPeriod::new(date(2024, 3, 31), date(2024, 3, 1), date(2024, 4, 1));

        assert!(matches!(result, Err(PayrollError::EndBeforeStart { .. })));
    }

    #[test]
    fn period_rejects_payment_before_end() {
        let result = PayrollPeriod::new(date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 25));

        assert_eq!(
            result,
            Err(PayrollError::PaymentBeforeEnd {
                end: date(2024, 3, 31),
                payment_date: date(2024, 3, 25),
            })
        );
    }

    #[test]
    fn period_allows_single_day() {
        let p = PayrollPeriod::new(date(2024, 3, 1), date(2024, 3, 1), date(2024, 3, 1)).unwrap();

        assert_eq!(p.start(), p.end());
        assert_eq!(p.payment_date(), date(2024, 3, 1));
    }

    // =========================================================================
    // process tests
    // =========================================================================

    #[test]
    fn new_run_is_draft_and_empty() {
        let run = PayrollRun::new("March 2024", period());

        assert_eq!(run.name(), "March 2024");
        assert_eq!(run.status(), PayrollStatus::Draft);
        assert!(run.items().is_empty());
        assert_eq!(run.totals(), &PayrollTotals::default());
    }

    #[test]
    fn process_skips_inactive_employees() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let employees = vec![
            employee("E1", dec!(100000), EmploymentStatus::Active),
            employee("E2", dec!(80000), EmploymentStatus::Terminated),
            employee("E3", dec!(60000), EmploymentStatus::Active),
        ];
        let mut run = PayrollRun::new("March 2024", period());

        let totals = run
            .process(&employees, &worksheet, &AllowancePolicy::default())
            .unwrap()
            .clone();

        assert_eq!(totals.employees, 2);
        assert_eq!(totals.total_basic_salary, dec!(160000));
        // 15% of basic per employee under the default policy
        assert_eq!(totals.total_allowances, dec!(24000));
        let ids: Vec<&str> = run.items().iter().map(|i| i.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E3"]);
        assert_eq!(run.status(), PayrollStatus::Completed);
    }

    #[test]
    fn process_totals_match_items() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let employees = vec![
            employee("E1", dec!(100000), EmploymentStatus::Active),
            employee("E2", dec!(250000), EmploymentStatus::Active),
        ];
        let mut run = PayrollRun::new("March 2024", period());

        run.process(&employees, &worksheet, &AllowancePolicy::default())
            .unwrap();

        let tax: Decimal = run.items().iter().map(|i| i.result.monthly_tax).sum();
        let net: Decimal = run.items().iter().map(|i| i.result.monthly_net_pay).sum();
        let deductions: Decimal = run
            .items()
            .iter()
            .map(|i| i.result.monthly_pension + i.result.monthly_nhf)
            .sum();
        assert_eq!(run.totals().total_tax, tax);
        assert_eq!(run.totals().total_net_pay, net);
        assert_eq!(run.totals().total_deductions, deductions);
    }

    #[test]
    fn process_single_employee_figures() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let employees = vec![employee("E1", dec!(100000), EmploymentStatus::Active)];
        let mut run = PayrollRun::new("March 2024", period());

        let totals = run
            .process(&employees, &worksheet, &AllowancePolicy::default())
            .unwrap();

        // gross 115000; pension 9200; nhf 2500
        assert_eq!(totals.total_deductions, dec!(11700));
        // taxable 1380000 - (200000 + 110400 + 30000) = 1039600
        // tax 54000 + 439600 * 0.15 = 119940, monthly 9995
        assert_eq!(round_half_up(totals.total_tax), dec!(9995));
        assert_eq!(round_half_up(totals.total_net_pay), dec!(93305));
    }

    #[test]
    fn process_twice_is_rejected() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let employees = vec![employee("E1", dec!(100000), EmploymentStatus::Active)];
        let mut run = PayrollRun::new("March 2024", period());
        run.process(&employees, &worksheet, &AllowancePolicy::default())
            .unwrap();

        let result = run.process(&employees, &worksheet, &AllowancePolicy::default());

        assert_eq!(result, Err(PayrollError::NotDraft(PayrollStatus::Completed)));
    }

    #[test]
    fn process_failure_leaves_run_in_draft() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let employees = vec![
            employee("E1", dec!(100000), EmploymentStatus::Active),
            employee("E2", dec!(-5), EmploymentStatus::Active),
        ];
        let mut run = PayrollRun::new("March 2024", period());

        let result = run.process(&employees, &worksheet, &AllowancePolicy::default());

        match result {
            Err(PayrollError::Employee { employee_id, .. }) => assert_eq!(employee_id, "E2"),
            other => panic!("expected Employee error, got {other:?}"),
        }
        assert_eq!(run.status(), PayrollStatus::Draft);
        assert!(run.items().is_empty());
    }

    #[test]
    fn process_with_no_active_employees_completes_empty() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let employees = vec![employee("E1", dec!(100000), EmploymentStatus::OnLeave)];
        let mut run = PayrollRun::new("March 2024", period());

        let totals = run
            .process(&employees, &worksheet, &AllowancePolicy::default())
            .unwrap();

        assert_eq!(totals.employees, 0);
        assert_eq!(totals.total_net_pay, dec!(0));
    }

    #[test]
    fn process_rejects_totals_past_decimal_range() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let employees: Vec<Employee> = (0..14)
            .map(|i| Employee {
                transport_allowance: Some(dec!(0)),
                housing_allowance: Some(dec!(0)),
                ..employee(&format!("E{i}"), Decimal::MAX / dec!(13), EmploymentStatus::Active)
            })
            .collect();
        let mut run = PayrollRun::new("March 2024", period());

        let result = run.process(&employees, &worksheet, &AllowancePolicy::default());

        assert_eq!(result, Err(PayrollError::TotalsOverflow));
        assert_eq!(run.status(), PayrollStatus::Draft);
        assert!(run.items().is_empty());
    }

    // =========================================================================
    // cancel tests
    // =========================================================================

    #[test]
    fn cancel_draft_run() {
        let mut run = PayrollRun::new("March 2024", period());

        run.cancel().unwrap();

        assert_eq!(run.status(), PayrollStatus::Cancelled);
    }

    #[test]
    fn cancelled_run_cannot_be_processed() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let mut run = PayrollRun::new("March 2024", period());
        run.cancel().unwrap();

        let result = run.process(&[], &worksheet, &AllowancePolicy::default());

        assert_eq!(result, Err(PayrollError::NotDraft(PayrollStatus::Cancelled)));
    }

    #[test]
    fn completed_run_cannot_be_cancelled() {
        let table = paye_table();
        let rates = StatutoryRates::default();
        let worksheet = StatutoryWorksheet::new(&table, &rates);
        let mut run = PayrollRun::new("March 2024", period());
        run.process(&[], &worksheet, &AllowancePolicy::default())
            .unwrap();

        assert_eq!(
            run.cancel(),
            Err(PayrollError::NotDraft(PayrollStatus::Completed))
        );
    }
}
