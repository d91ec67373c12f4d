//! Cohort output generation.
//!
//! Renders harmonized tables, keep lists and run summaries in memory, then
//! writes them into an output directory:
//!
//! - **Harmonizer**: `covariates.filtered.tsv`, `phenotypes.filtered.tsv`,
//!   `keep_ids.txt`, `harmonization_summary.txt`
//! - **Sex partitioner**: `data_male/`, `data_female/` (and optionally
//!   `data_unknown/`) each holding `WMH_covariates.tsv` and
//!   `WMH_phenotypes.tsv`, plus `sex_split_summary.txt`

mod error;
mod outdir;
mod summary;
mod tsv;

pub use error::{OutputError, Result};
pub use outdir::{
    COVARIATES_FILE, GROUP_COVARIATES_FILE, GROUP_PHENOTYPES_FILE, HARMONIZATION_SUMMARY_FILE,
    KEEP_IDS_FILE, PHENOTYPES_FILE, SEX_SPLIT_SUMMARY_FILE, SplitOptions, WriteOptions,
    WrittenFiles, ensure_dir, ensure_empty_or_absent, write_harmonized, write_replacing,
    write_sex_partition,
};
pub use summary::{render_harmonization_summary, render_sex_split_summary};
pub use tsv::{render_id_list, render_tsv};
