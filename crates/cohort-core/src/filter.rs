//! Restricting tables to the reconciled cohort.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, SortMultipleOptions};
use tracing::info;

use cohort_model::{HarmonizationSummary, IdentifierSet, trimmed_values};

use crate::error::Result;
use crate::reconcile::Cohort;

/// Everything the harmonizer writes, computed before any file is touched.
#[derive(Debug, Clone)]
pub struct HarmonizedOutputs {
    pub covariates: DataFrame,
    pub phenotypes: DataFrame,
    /// Common IDs in lexicographic order.
    pub keep_ids: Vec<String>,
    pub summary: HarmonizationSummary,
}

/// Keeps rows whose trimmed identifier is in `keep`, sorted by identifier
/// (lexicographic over the string bytes).
pub fn restrict_to(df: &DataFrame, id_col: &str, keep: &IdentifierSet) -> Result<DataFrame> {
    let mask: Vec<bool> = trimmed_values(df, id_col)?
        .iter()
        .map(|id| id.as_deref().is_some_and(|id| keep.contains(id)))
        .collect();
    let mask = BooleanChunked::from_slice("keep".into(), &mask);
    let filtered = df.filter(&mask)?;
    let sorted = filtered.sort([id_col], SortMultipleOptions::default())?;
    Ok(sorted)
}

/// Filters both normalized tables to the common IDs and builds the summary.
///
/// Fails on an empty cohort, so nothing downstream ever sees one.
pub fn harmonize(cohort: &Cohort) -> Result<HarmonizedOutputs> {
    cohort.ensure_non_empty()?;

    let covariates = restrict_to(&cohort.covariates.frame, &cohort.id_col, &cohort.common)?;
    let phenotypes = restrict_to(&cohort.phenotypes.frame, &cohort.id_col, &cohort.common)?;
    let keep_ids: Vec<String> = cohort.common.iter().map(str::to_string).collect();

    let counts = cohort.counts();
    let summary = HarmonizationSummary {
        covariates_unique_ids: counts.covariates_unique_ids,
        phenotypes_unique_ids: counts.phenotypes_unique_ids,
        vcf_unique_ids: counts.genotype_unique_ids,
        common_ids: counts.common_ids,
        covariates_rows_written: covariates.height(),
        phenotypes_rows_written: phenotypes.height(),
    };
    info!(
        common_ids = summary.common_ids,
        covariates_rows = summary.covariates_rows_written,
        phenotypes_rows = summary.phenotypes_rows_written,
        "tables restricted to cohort"
    );

    Ok(HarmonizedOutputs {
        covariates,
        phenotypes,
        keep_ids,
        summary,
    })
}
