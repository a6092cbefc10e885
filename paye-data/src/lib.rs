mod loader;

pub use loader::{
    BracketLoaderError, BracketRecord, BracketTableLoader, DEFAULT_TABLE_CSV, default_table,
};
