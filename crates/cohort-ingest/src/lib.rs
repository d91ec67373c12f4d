//! Cohort data ingestion.
//!
//! Loads covariate and phenotype tables whose delimiter is not known up
//! front, and genotype sample ID lists.
//!
//! # Loading strategy
//!
//! 1. Sniff the header line: comma when it holds more commas than tabs,
//!    tab otherwise.
//! 2. Parse the whole file under that delimiter, every column as text.
//! 3. If that parse fails structurally, split each line on runs of
//!    whitespace instead.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cohort_ingest::{read_sample_ids, read_table};
//!
//! let covariates = read_table(Path::new("covariates.csv"))?;
//! let samples = read_sample_ids(Path::new("samples.txt"))?;
//! ```

mod delimiter;
mod error;
mod reader;
mod samples;

// === Error Types ===
pub use error::{IngestError, Result};

// === Delimiter Detection ===
pub use delimiter::{Delimiter, detect_delimiter, sniff_delimiter};

// === Table Loading ===
pub use reader::{LoadedTable, read_table, read_table_with};

// === Sample IDs ===
pub use samples::read_sample_ids;
