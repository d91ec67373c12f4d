//! Command implementations behind the two binaries.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span};

use cohort_core::{
    CohortCounts, SampleIdFile, SampleSource, compute_cohort, harmonize, partition_by_sex,
};
use cohort_ingest::{Delimiter, LoadedTable, read_table, read_table_with};
use cohort_model::{HarmonizationSummary, SexSplitSummary};
use cohort_output::{
    SplitOptions, WriteOptions, WrittenFiles, write_harmonized, write_sex_partition,
};

use crate::config::{HarmonizeSettings, SampleSourceChoice, SplitSettings};

/// Result of a `harmonize-inputs` run.
#[derive(Debug, Clone)]
pub enum HarmonizeOutcome {
    /// Counts only; nothing was written and the output directory untouched.
    DryRun(CohortCounts),
    Written {
        summary: HarmonizationSummary,
        outdir: PathBuf,
        files: WrittenFiles,
    },
}

/// Result of a `split-by-sex` run.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub summary: SexSplitSummary,
    pub outdir: PathBuf,
    pub files: WrittenFiles,
}

/// Loads, validates and reconciles the three inputs; writes outputs unless
/// this is a dry run.
///
/// Dry and real runs share everything up to the reconciled cohort. A dry run
/// with an empty overlap returns its counts; the caller reports the failure
/// (see [`ensure_dry_run_overlap`]).
pub fn run_harmonize(settings: &HarmonizeSettings) -> Result<HarmonizeOutcome> {
    let span = info_span!("harmonize", dry_run = settings.dry_run);
    let _guard = span.enter();
    let start = Instant::now();

    let covariates = load_table(&settings.covar, "covariates")?;
    let phenotypes = load_table(&settings.pheno, "phenotypes")?;
    debug!(
        sex_col = %settings.sex_col,
        vcf = %settings.vcf.display(),
        "sex column is not checked by the harmonizer"
    );

    let source: Box<dyn SampleSource> = match &settings.samples {
        SampleSourceChoice::File(path) => Box::new(SampleIdFile::new(path)),
        SampleSourceChoice::Command(command) => Box::new(command.clone()),
    };
    let cohort = compute_cohort(
        &covariates.frame,
        &phenotypes.frame,
        source.as_ref(),
        &settings.cohort,
    )?;

    if settings.dry_run {
        info!(
            duration_ms = start.elapsed().as_millis(),
            "dry run complete, nothing written"
        );
        return Ok(HarmonizeOutcome::DryRun(cohort.counts()));
    }

    let outputs = harmonize(&cohort)?;
    let files = write_harmonized(
        &settings.outdir,
        &outputs,
        &WriteOptions {
            no_clobber: settings.no_clobber,
        },
    )
    .with_context(|| format!("failed to write outputs to {}", settings.outdir.display()))?;

    info!(
        common_ids = outputs.summary.common_ids,
        duration_ms = start.elapsed().as_millis(),
        "harmonization complete"
    );
    Ok(HarmonizeOutcome::Written {
        summary: outputs.summary,
        outdir: settings.outdir.clone(),
        files,
    })
}

/// Fails a dry run whose overlap is empty.
pub fn ensure_dry_run_overlap(counts: &CohortCounts) -> Result<()> {
    if counts.common_ids == 0 {
        bail!(
            "Strong dry-run failed: no overlapping IDs among covariates, phenotypes, and genotype samples."
        );
    }
    Ok(())
}

/// Splits covariate/phenotype TSVs by sex and writes the group directories.
pub fn run_sex_split(settings: &SplitSettings) -> Result<SplitOutcome> {
    let span = info_span!("split_by_sex");
    let _guard = span.enter();
    let start = Instant::now();

    let covariates = load_tsv(&settings.covar, "covariates")?;
    let phenotypes = load_tsv(&settings.pheno, "phenotypes")?;
    let partition = partition_by_sex(&covariates.frame, &phenotypes.frame, &settings.partition)?;

    let files = write_sex_partition(
        &settings.outdir,
        &partition,
        &SplitOptions {
            no_clobber: settings.no_clobber,
            keep_unknown: settings.keep_unknown,
        },
    )
    .with_context(|| format!("failed to write outputs to {}", settings.outdir.display()))?;

    let summary = partition.summary();
    info!(
        male_ids = summary.male_ids,
        female_ids = summary.female_ids,
        unknown_ids = summary.unknown_ids,
        duration_ms = start.elapsed().as_millis(),
        "sex split complete"
    );
    Ok(SplitOutcome {
        summary,
        outdir: settings.outdir.clone(),
        files,
    })
}

fn load_table(path: &Path, label: &str) -> Result<LoadedTable> {
    let table =
        read_table(path).with_context(|| format!("failed to load {label} from {}", path.display()))?;
    info!(
        table = label,
        rows = table.height(),
        delimiter = %table.delimiter,
        "input loaded"
    );
    Ok(table)
}

fn load_tsv(path: &Path, label: &str) -> Result<LoadedTable> {
    let table = read_table_with(path, Delimiter::Tab)
        .with_context(|| format!("failed to load {label} from {}", path.display()))?;
    info!(table = label, rows = table.height(), "input loaded");
    Ok(table)
}
