//! Cohort harmonization core.
//!
//! Everything here operates on in-memory tables; file loading lives in
//! `cohort-ingest` and file writing in `cohort-output`. The one boundary to
//! the outside world is [`SampleSource`], which supplies genotype sample
//! IDs from a file, an external listing tool, or a test double.
//!
//! The harmonizer pipeline is:
//!
//! 1. [`compute_cohort`]: validate required columns, normalize IDs, fetch
//!    sample IDs once, intersect.
//! 2. [`harmonize`]: restrict both tables to the common IDs and sort them.
//!
//! Dry runs stop after step 1 and report [`Cohort::counts`].

pub mod error;
pub mod filter;
pub mod normalize;
pub mod partition;
pub mod reconcile;
pub mod sample_source;
pub mod validate;

pub use error::{CohortError, Result};
pub use filter::{HarmonizedOutputs, harmonize, restrict_to};
pub use normalize::{NormalizeStats, NormalizedTable, normalize_ids};
pub use partition::{PartitionSettings, SexPartition, SexSubset, partition_by_sex};
pub use reconcile::{
    Cohort, CohortCounts, CohortSettings, DEFAULT_REQUIRED_COVARIATES,
    DEFAULT_REQUIRED_PHENOTYPES, compute_cohort,
};
pub use sample_source::{SampleIdFile, SampleListCommand, SampleSource};
pub use validate::{TableRole, parse_column_list, require_columns, required_column_list};
