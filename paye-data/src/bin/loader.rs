use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use paye_core::ProgressiveTaxCalculator;
use paye_data::BracketTableLoader;
use rust_decimal::Decimal;

/// Validate a PAYE bracket table CSV file and print it.
///
/// The CSV file should have the following columns:
/// - lower_limit: where the band starts
/// - upper_limit: where it ends (empty for the unbounded top band)
/// - rate_percent: the marginal rate as a percentage (e.g., 7)
#[derive(Parser, Debug)]
#[command(name = "paye-brackets")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the bracket table
    #[arg(short, long)]
    file: PathBuf,

    /// Annual taxable income to run through the table
    #[arg(short, long)]
    income: Option<Decimal>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Validating bracket table: {}", args.file.display());

    let table = BracketTableLoader::load_from_path(&args.file)
        .with_context(|| format!("Failed to load: {}", args.file.display()))?;

    println!(
        "{} brackets, top rate {}%",
        table.len(),
        (table.top_rate() * Decimal::ONE_HUNDRED).normalize()
    );
    for bracket in table.brackets() {
        println!("  {bracket}");
    }

    if let Some(income) = args.income {
        let calculator = ProgressiveTaxCalculator::new(&table);
        let breakdown = calculator.compute_breakdown(income);
        println!();
        for line in &breakdown.lines {
            println!(
                "  {:<28} {:>16} {:>14}",
                line.bracket.to_string(),
                line.taxable_amount,
                line.tax
            );
        }
        println!("Tax on {income}: {}", breakdown.total_tax);
    }

    Ok(())
}
