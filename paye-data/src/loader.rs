use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use paye_core::{BracketTable, BracketTableError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// The Nigerian PAYE table shipped with this crate.
pub const DEFAULT_TABLE_CSV: &str = include_str!("../data/nigeria_paye_2023.csv");

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bracket table: {0}")]
    Table(#[from] BracketTableError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket CSV file.
///
/// - `lower_limit`: where the band starts
/// - `upper_limit`: where it ends (empty for the unbounded top band)
/// - `rate_percent`: the marginal rate as a percentage (e.g., 7 for 7%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_decimal")]
    pub lower_limit: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_limit: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate_percent: Decimal,
}

impl BracketRecord {
    fn to_bracket(&self) -> TaxBracket {
        TaxBracket {
            lower_bound: self.lower_limit,
            upper_bound: self.upper_limit,
            rate: self.rate_percent / Decimal::ONE_HUNDRED,
        }
    }
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables stored as CSV.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Turn parsed records into a validated table.
    ///
    /// Rows are sorted by `lower_limit` first, so the file may list bands in
    /// any order. Percentages are converted to fractions.
    pub fn build(records: &[BracketRecord]) -> Result<BracketTable, BracketLoaderError> {
        let mut sorted: Vec<&BracketRecord> = records.iter().collect();
        sorted.sort_by(|a, b| a.lower_limit.cmp(&b.lower_limit));

        let brackets = sorted.into_iter().map(BracketRecord::to_bracket).collect();
        let table = BracketTable::new(brackets)?;

        tracing::info!(
            brackets = table.len(),
            top_rate = %table.top_rate(),
            "bracket table loaded"
        );
        Ok(table)
    }

    pub fn load<R: Read>(reader: R) -> Result<BracketTable, BracketLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<BracketTable, BracketLoaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "reading bracket table");
        Self::load(file)
    }
}

/// The shipped Nigerian PAYE table.
pub fn default_table() -> Result<BracketTable, BracketLoaderError> {
    BracketTableLoader::load(DEFAULT_TABLE_CSV.as_bytes())
}
