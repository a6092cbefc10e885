//! Plain-text rendering of calculation results for the terminal.

use std::fmt;

use paye_core::{PayrollRun, StatutoryResult, TaxBreakdown};

use crate::utils::{format_naira, format_percent};

/// Per-bracket table followed by the total and effective rate.
pub struct BreakdownReport<'a>(pub &'a TaxBreakdown);

impl fmt::Display for BreakdownReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let breakdown = self.0;
        writeln!(f, "{:<26} {:>18} {:>16}", "Bracket", "Taxable", "Tax")?;
        for line in &breakdown.lines {
            writeln!(
                f,
                "{:<26} {:>18} {:>16}",
                line.bracket.to_string(),
                format_naira(line.taxable_amount),
                format_naira(line.tax)
            )?;
        }
        writeln!(
            f,
            "{:<26} {:>18} {:>16}",
            "Total",
            format_naira(breakdown.taxable_income),
            format_naira(breakdown.total_tax)
        )?;
        writeln!(
            f,
            "Effective rate: {}",
            format_percent(breakdown.effective_rate().round_dp(4))
        )
    }
}

/// A payslip-style summary of one statutory worksheet.
pub struct StatutoryReport<'a>(pub &'a StatutoryResult);

impl fmt::Display for StatutoryReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.0;
        let monthly = [
            ("Basic salary", result.monthly_basic),
            ("Transport allowance", result.monthly_transport),
            ("Housing allowance", result.monthly_housing),
            ("Other allowances", result.monthly_other),
            ("Gross pay", result.monthly_gross),
            ("Pension (employee)", result.monthly_pension),
            ("Pension (employer)", result.monthly_employer_pension),
            ("NHF", result.monthly_nhf),
            ("PAYE tax", result.monthly_tax),
            ("Total deductions", result.total_monthly_deductions),
            ("Net pay", result.monthly_net_pay),
        ];
        let annual = [
            ("Gross income", result.annual_gross),
            ("Consolidated relief", result.consolidated_relief),
            ("Taxable income", result.annual_taxable_income),
            ("PAYE tax", result.annual_tax),
        ];

        writeln!(f, "Monthly")?;
        for (label, amount) in monthly {
            writeln!(f, "  {label:<22} {:>18}", format_naira(amount))?;
        }
        writeln!(f, "Annual")?;
        for (label, amount) in annual {
            writeln!(f, "  {label:<22} {:>18}", format_naira(amount))?;
        }

        if result.is_pension_exempt {
            writeln!(f, "Contract staff: pension exempt")?;
        }
        Ok(())
    }
}

/// One line per employee plus the run totals.
pub struct PayrollReport<'a>(pub &'a PayrollRun);

impl fmt::Display for PayrollReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let run = self.0;
        let period = run.period();
        writeln!(
            f,
            "{} [{}] {} to {}, paid {}",
            run.name(),
            run.status(),
            period.start(),
            period.end(),
            period.payment_date()
        )?;
        writeln!(
            f,
            "{:<10} {:<24} {:>16} {:>16} {:>14} {:>16}",
            "ID", "Name", "Gross", "Deductions", "Tax", "Net"
        )?;
        for item in run.items() {
            let r = &item.result;
            writeln!(
                f,
                "{:<10} {:<24} {:>16} {:>16} {:>14} {:>16}",
                item.employee_id,
                item.name,
                format_naira(r.monthly_gross),
                format_naira(r.monthly_pension + r.monthly_nhf),
                format_naira(r.monthly_tax),
                format_naira(r.monthly_net_pay)
            )?;
        }

        let totals = run.totals();
        writeln!(f, "Employees paid:   {}", totals.employees)?;
        writeln!(f, "Basic salaries:   {}", format_naira(totals.total_basic_salary))?;
        writeln!(f, "Allowances:       {}", format_naira(totals.total_allowances))?;
        writeln!(f, "Deductions:       {}", format_naira(totals.total_deductions))?;
        writeln!(f, "PAYE tax:         {}", format_naira(totals.total_tax))?;
        writeln!(f, "Net pay:          {}", format_naira(totals.total_net_pay))
    }
}

pub fn render_breakdown(breakdown: &TaxBreakdown) -> String {
    BreakdownReport(breakdown).to_string()
}

pub fn render_statutory(result: &StatutoryResult) -> String {
    StatutoryReport(result).to_string()
}

pub fn render_payroll(run: &PayrollRun) -> String {
    PayrollReport(run).to_string()
}
