use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use paye_cli::config::PayeConfig;
use paye_cli::utils::{format_naira, format_percent, parse_decimal};
use paye_cli::{csv_loader, logging, report};
use paye_core::{
    PayrollPeriod, PayrollRun, ProgressiveTaxCalculator, StatutoryInput, StatutoryWorksheet,
    prorate_amount, validate_birth_date,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Nigerian PAYE tax and payroll calculator.
///
/// Amounts accept comma thousands separators (e.g. `1,250,000`).
#[derive(Debug, Parser)]
#[command(name = "paye", version)]
struct Cli {
    /// Path to a `paye.toml` configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Annual PAYE tax on a taxable income.
    Tax {
        #[arg(value_parser = parse_decimal)]
        income: Decimal,

        /// Bracket CSV to use instead of the configured table.
        #[arg(long)]
        brackets: Option<PathBuf>,

        /// Show the tax charged in each bracket.
        #[arg(long)]
        breakdown: bool,
    },

    /// Monthly statutory deductions and net pay for one salary.
    Statutory {
        #[arg(long, value_parser = parse_decimal, required_unless_present = "gross")]
        basic: Option<Decimal>,

        /// Monthly gross, split by the configured `[salary_structure]`.
        #[arg(
            long,
            value_parser = parse_decimal,
            conflicts_with_all = ["basic", "transport", "housing", "other"]
        )]
        gross: Option<Decimal>,

        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        transport: Decimal,

        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        housing: Decimal,

        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        other: Decimal,

        /// Contract staff are exempt from pension.
        #[arg(long)]
        contract: bool,
    },

    /// Process a payroll run for the employees in a CSV file.
    Payroll {
        employees: PathBuf,

        #[arg(long)]
        start: NaiveDate,

        #[arg(long)]
        end: NaiveDate,

        #[arg(long)]
        payment_date: NaiveDate,

        /// Run name; defaults to the period's month.
        #[arg(long)]
        name: Option<String>,
    },

    /// Age in whole years, checked against a minimum employment age.
    Age {
        birth_date: NaiveDate,

        /// Date to measure on; defaults to today.
        #[arg(long)]
        on: Option<NaiveDate>,

        #[arg(long, default_value_t = 18)]
        minimum_age: i32,
    },

    /// Share of a monthly amount earned over a partial month.
    Prorate {
        #[arg(value_parser = parse_decimal)]
        amount: Decimal,

        #[arg(long)]
        start: NaiveDate,

        #[arg(long)]
        end: NaiveDate,

        #[arg(long)]
        month: u32,

        #[arg(long)]
        year: i32,
    },
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_tax(
    config: &PayeConfig,
    income: Decimal,
    brackets: Option<PathBuf>,
    breakdown: bool,
) -> Result<()> {
    let table = config
        .bracket_table(brackets.as_deref())
        .context("failed to load bracket table")?;
    let calculator = ProgressiveTaxCalculator::new(&table);

    if breakdown {
        print!("{}", report::render_breakdown(&calculator.compute_breakdown(income)));
    } else {
        println!("{}", format_naira(calculator.compute_tax(income)));
    }
    debug!(marginal_rate = %format_percent(calculator.marginal_rate(income)), "tax computed");
    Ok(())
}

fn split_gross(
    config: &PayeConfig,
    gross: Decimal,
    is_contract: bool,
) -> Result<StatutoryInput> {
    let structure = config
        .salary_structure
        .as_ref()
        .context("--gross needs a [salary_structure] section in the config file")?;
    debug!(structure = structure.name(), gross = %gross, "splitting gross salary");
    Ok(structure.split(gross, is_contract))
}

fn run_statutory(
    config: &PayeConfig,
    input: StatutoryInput,
) -> Result<()> {
    let table = config
        .bracket_table(None)
        .context("failed to load bracket table")?;
    let worksheet = StatutoryWorksheet::new(&table, &config.rates);

    let result = worksheet.calculate(&input)?;
    print!("{}", report::render_statutory(&result));
    println!();
    print!("{}", report::render_breakdown(&result.tax_breakdown));
    Ok(())
}

fn run_payroll(
    config: &PayeConfig,
    employees_path: PathBuf,
    period: PayrollPeriod,
    name: Option<String>,
) -> Result<()> {
    let table = config
        .bracket_table(None)
        .context("failed to load bracket table")?;
    let worksheet = StatutoryWorksheet::new(&table, &config.rates);

    let employees = csv_loader::load_from_file(&employees_path)
        .with_context(|| format!("failed to load employees from {}", employees_path.display()))?;

    let name = name.unwrap_or_else(|| format!("Payroll {}", period.start().format("%B %Y")));
    let mut run = PayrollRun::new(name, period);
    run.process(&employees, &worksheet, &config.allowances)?;

    print!("{}", report::render_payroll(&run));
    Ok(())
}

fn run_age(
    birth_date: NaiveDate,
    on: Option<NaiveDate>,
    minimum_age: i32,
) -> Result<()> {
    let on = on.unwrap_or_else(|| Local::now().date_naive());
    let age = validate_birth_date(birth_date, on, minimum_age)?;
    println!("{age}");
    Ok(())
}

fn run_prorate(
    amount: Decimal,
    start: NaiveDate,
    end: NaiveDate,
    month: u32,
    year: i32,
) -> Result<()> {
    let prorated = prorate_amount(amount, start, end, month, year)?;
    println!("{}", format_naira(prorated));
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PayeConfig::load(cli.config.as_deref())?;
    logging::init_logging(&config.logging)?;
    debug!(config = ?cli.config, "configuration loaded");

    match cli.command {
        Command::Tax {
            income,
            brackets,
            breakdown,
        } => run_tax(&config, income, brackets, breakdown),
        Command::Statutory {
            basic,
            gross,
            transport,
            housing,
            other,
            contract,
        } => {
            let input = match (gross, basic) {
                (Some(gross), _) => split_gross(&config, gross, contract)?,
                (None, basic) => StatutoryInput {
                    basic_salary: basic.unwrap_or_default(),
                    transport_allowance: transport,
                    housing_allowance: housing,
                    other_allowances: other,
                    is_contract: contract,
                },
            };
            run_statutory(&config, input)
        }
        Command::Payroll {
            employees,
            start,
            end,
            payment_date,
            name,
        } => {
            let period = PayrollPeriod::new(start, end, payment_date)?;
            run_payroll(&config, employees, period, name)
        }
        Command::Age {
            birth_date,
            on,
            minimum_age,
        } => run_age(birth_date, on, minimum_age),
        Command::Prorate {
            amount,
            start,
            end,
            month,
            year,
        } => run_prorate(amount, start, end, month, year),
    }
}
