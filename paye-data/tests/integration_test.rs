//! Integration tests for bracket table loading from on-disk CSV files.

use std::path::PathBuf;

use paye_core::{BracketTableError, ProgressiveTaxCalculator, compute_tax};
use paye_data::{BracketLoaderError, BracketTableLoader, default_table};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_shipped_table_from_disk() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("nigeria_paye_2023.csv");

    let table = BracketTableLoader::load_from_path(&path).expect("Failed to load shipped table");

    assert_eq!(table, default_table().expect("Failed to load default table"));
}

#[test]
fn test_unordered_file_matches_default_table() {
    let table = BracketTableLoader::load_from_path(fixture("unordered_brackets.csv"))
        .expect("Failed to load unordered table");

    assert_eq!(table, default_table().expect("Failed to load default table"));
}

#[test]
fn test_reference_amounts_through_loaded_table() {
    let table = default_table().expect("Failed to load default table");

    assert_eq!(compute_tax(dec!(0), &table), dec!(0));
    assert_eq!(compute_tax(dec!(300000), &table), dec!(21000));
    assert_eq!(compute_tax(dec!(600000), &table), dec!(54000));
    assert_eq!(compute_tax(dec!(1100000), &table), dec!(129000));
    assert_eq!(compute_tax(dec!(4000000), &table), dec!(752000));
}

#[test]
fn test_breakdown_through_loaded_table() {
    let table = default_table().expect("Failed to load default table");
    let calculator = ProgressiveTaxCalculator::new(&table);

    let breakdown = calculator.compute_breakdown(dec!(4000000));

    assert_eq!(breakdown.lines.len(), 6);
    assert_eq!(breakdown.lines[5].taxable_amount, dec!(800000));
    assert_eq!(breakdown.lines[5].tax, dec!(192000));
}

#[test]
fn test_flat_rate_table() {
    let table = BracketTableLoader::load_from_path(fixture("flat_rate.csv"))
        .expect("Failed to load flat table");

    assert_eq!(table.len(), 1);
    assert_eq!(compute_tax(dec!(123456), &table), dec!(12345.6));
}

#[test]
fn test_gap_between_bands_is_rejected() {
    let result = BracketTableLoader::load_from_path(fixture("gap_brackets.csv"));

    match result {
        Err(BracketLoaderError::Table(BracketTableError::NotContiguous {
            index,
            expected,
            found,
        })) => {
            assert_eq!(index, 1);
            assert_eq!(expected, dec!(300000));
            assert_eq!(found, dec!(350000));
        }
        other => panic!("expected NotContiguous, got {other:?}"),
    }
}

#[test]
fn test_bounded_top_band_is_rejected() {
    let result = BracketTableLoader::load_from_path(fixture("bounded_top.csv"));

    assert!(matches!(
        result,
        Err(BracketLoaderError::Table(BracketTableError::BoundedTop))
    ));
}
