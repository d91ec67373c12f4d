//! Error types for cohort harmonization.

use thiserror::Error;

use cohort_ingest::IngestError;

use crate::validate::TableRole;

/// Terminal failures of a harmonization or partitioning run.
#[derive(Debug, Error)]
pub enum CohortError {
    /// A required column is absent after header normalization.
    #[error("missing required {role} column '{column}'. Columns: {present:?}")]
    MissingColumn {
        role: TableRole,
        column: String,
        present: Vec<String>,
    },

    /// No identifier is shared by all three sources.
    #[error(
        "no overlapping IDs among covariates, phenotypes, and genotype samples \
         (covariates={covariates}, phenotypes={phenotypes}, samples={samples})"
    )]
    EmptyIntersection {
        covariates: usize,
        phenotypes: usize,
        samples: usize,
    },

    /// The sample-listing tool could not be run or exited unsuccessfully.
    #[error("sample listing failed ({command}): {reason}")]
    ExternalTool { command: String, reason: String },

    /// An input file could not be loaded.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for CohortError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for harmonization operations.
pub type Result<T> = std::result::Result<T, CohortError>;
