//! Three-way ID reconciliation.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use cohort_model::{IdentifierSet, intersect3};

use crate::error::{CohortError, Result};
use crate::normalize::{NormalizedTable, normalize_ids};
use crate::sample_source::SampleSource;
use crate::validate::{TableRole, require_columns, required_column_list};

pub const DEFAULT_REQUIRED_COVARIATES: &[&str] =
    &["ID", "age", "sex", "PC1", "PC2", "PC3", "PC4", "PC5"];
pub const DEFAULT_REQUIRED_PHENOTYPES: &[&str] = &["ID"];

/// Column expectations for one harmonization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortSettings {
    pub id_col: String,
    pub required_covariates: Vec<String>,
    pub required_phenotypes: Vec<String>,
}

impl Default for CohortSettings {
    fn default() -> Self {
        Self {
            id_col: "ID".to_string(),
            required_covariates: DEFAULT_REQUIRED_COVARIATES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            required_phenotypes: DEFAULT_REQUIRED_PHENOTYPES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

/// Unique-ID counts reported by both dry and real runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortCounts {
    pub covariates_unique_ids: usize,
    pub phenotypes_unique_ids: usize,
    pub genotype_unique_ids: usize,
    pub common_ids: usize,
}

/// Normalized inputs plus the IDs shared by all three sources.
#[derive(Debug, Clone)]
pub struct Cohort {
    pub id_col: String,
    pub covariates: NormalizedTable,
    pub phenotypes: NormalizedTable,
    pub sample_ids: IdentifierSet,
    pub common: IdentifierSet,
}

impl Cohort {
    pub fn counts(&self) -> CohortCounts {
        CohortCounts {
            covariates_unique_ids: self.covariates.ids.len(),
            phenotypes_unique_ids: self.phenotypes.ids.len(),
            genotype_unique_ids: self.sample_ids.len(),
            common_ids: self.common.len(),
        }
    }

    /// Fails with [`CohortError::EmptyIntersection`] when no ID is shared.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.common.is_empty() {
            return Err(CohortError::EmptyIntersection {
                covariates: self.covariates.ids.len(),
                phenotypes: self.phenotypes.ids.len(),
                samples: self.sample_ids.len(),
            });
        }
        Ok(())
    }
}

/// Validates and normalizes both tables, fetches sample IDs once and
/// intersects the three ID sets.
///
/// This is the step shared by dry and real runs. It does not fail on an
/// empty intersection; callers decide how to report that through
/// [`Cohort::ensure_non_empty`].
pub fn compute_cohort(
    covariates: &DataFrame,
    phenotypes: &DataFrame,
    samples: &dyn SampleSource,
    settings: &CohortSettings,
) -> Result<Cohort> {
    let span = info_span!("compute_cohort", id_col = %settings.id_col);
    let _guard = span.enter();
    let start = Instant::now();

    // Both tables are validated before anything else runs.
    let id_col = settings.id_col.trim();
    require_columns(
        covariates,
        TableRole::Covariates,
        &required_column_list(id_col, &settings.required_covariates),
    )?;
    require_columns(
        phenotypes,
        TableRole::Phenotypes,
        &required_column_list(id_col, &settings.required_phenotypes),
    )?;

    let covariates = normalize_ids(covariates, id_col)?;
    let phenotypes = normalize_ids(phenotypes, id_col)?;

    let sample_ids = samples.sample_ids()?;
    let common = intersect3(&covariates.ids, &phenotypes.ids, &sample_ids);

    info!(
        covariates_unique_ids = covariates.ids.len(),
        phenotypes_unique_ids = phenotypes.ids.len(),
        genotype_unique_ids = sample_ids.len(),
        common_ids = common.len(),
        sample_source = %samples.describe(),
        duration_ms = start.elapsed().as_millis(),
        "cohort computed"
    );

    Ok(Cohort {
        id_col: id_col.to_string(),
        covariates,
        phenotypes,
        sample_ids,
        common,
    })
}
