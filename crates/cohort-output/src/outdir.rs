//! Output directory handling and the two run layouts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, info_span};

use cohort_core::{HarmonizedOutputs, SexPartition};
use cohort_model::SexGroup;

use crate::error::{OutputError, Result};
use crate::summary::{render_harmonization_summary, render_sex_split_summary};
use crate::tsv::{render_id_list, render_tsv};

pub const COVARIATES_FILE: &str = "covariates.filtered.tsv";
pub const PHENOTYPES_FILE: &str = "phenotypes.filtered.tsv";
pub const KEEP_IDS_FILE: &str = "keep_ids.txt";
pub const HARMONIZATION_SUMMARY_FILE: &str = "harmonization_summary.txt";

pub const GROUP_COVARIATES_FILE: &str = "WMH_covariates.tsv";
pub const GROUP_PHENOTYPES_FILE: &str = "WMH_phenotypes.tsv";
pub const SEX_SPLIT_SUMMARY_FILE: &str = "sex_split_summary.txt";

const PARTIAL_SUFFIX: &str = "partial";

/// Options for [`write_harmonized`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Refuse to write into an existing, non-empty output directory.
    pub no_clobber: bool,
}

/// Options for [`write_sex_partition`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    pub no_clobber: bool,
    /// Also write `data_unknown/` when the unknown group is non-empty.
    pub keep_unknown: bool,
}

/// Paths of the files a run wrote, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    pub paths: Vec<PathBuf>,
}

/// A fully rendered file waiting to be written.
struct PendingFile {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl PendingFile {
    fn new(path: PathBuf, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            bytes: bytes.into(),
        }
    }
}

/// Writes the four harmonizer outputs into `outdir`.
///
/// Everything is rendered before the first file is touched; each file is
/// then written to a `.partial` sibling and renamed into place.
pub fn write_harmonized(
    outdir: &Path,
    outputs: &HarmonizedOutputs,
    options: &WriteOptions,
) -> Result<WrittenFiles> {
    let span = info_span!("write_harmonized", outdir = %outdir.display());
    let _guard = span.enter();
    let start = Instant::now();

    if options.no_clobber {
        ensure_empty_or_absent(outdir)?;
    }
    let files = vec![
        PendingFile::new(
            outdir.join(COVARIATES_FILE),
            render_tsv(&outputs.covariates, COVARIATES_FILE)?,
        ),
        PendingFile::new(
            outdir.join(PHENOTYPES_FILE),
            render_tsv(&outputs.phenotypes, PHENOTYPES_FILE)?,
        ),
        PendingFile::new(
            outdir.join(KEEP_IDS_FILE),
            render_id_list(outputs.keep_ids.iter().map(String::as_str)),
        ),
        PendingFile::new(
            outdir.join(HARMONIZATION_SUMMARY_FILE),
            render_harmonization_summary(&outputs.summary),
        ),
    ];

    ensure_dir(outdir)?;
    let written = commit(files)?;
    info!(
        files = written.paths.len(),
        duration_ms = start.elapsed().as_millis(),
        "harmonized outputs written"
    );
    Ok(written)
}

/// Writes one subdirectory per sex group plus `sex_split_summary.txt`.
///
/// Male and female directories are always written, header-only when the
/// group is empty. The unknown directory is written only when requested and
/// non-empty.
pub fn write_sex_partition(
    outdir: &Path,
    partition: &SexPartition,
    options: &SplitOptions,
) -> Result<WrittenFiles> {
    let span = info_span!("write_sex_partition", outdir = %outdir.display());
    let _guard = span.enter();
    let start = Instant::now();

    if options.no_clobber {
        ensure_empty_or_absent(outdir)?;
    }

    let mut groups = vec![SexGroup::Male, SexGroup::Female];
    if options.keep_unknown && !partition.unknown.ids.is_empty() {
        groups.push(SexGroup::Unknown);
    }

    let mut files = Vec::new();
    for group in &groups {
        let subset = partition.group(*group);
        let dir = outdir.join(group.dir_name());
        files.push(PendingFile::new(
            dir.join(GROUP_COVARIATES_FILE),
            render_tsv(&subset.covariates, GROUP_COVARIATES_FILE)?,
        ));
        files.push(PendingFile::new(
            dir.join(GROUP_PHENOTYPES_FILE),
            render_tsv(&subset.phenotypes, GROUP_PHENOTYPES_FILE)?,
        ));
    }
    files.push(PendingFile::new(
        outdir.join(SEX_SPLIT_SUMMARY_FILE),
        render_sex_split_summary(&partition.summary()),
    ));

    ensure_dir(outdir)?;
    for group in &groups {
        ensure_dir(&outdir.join(group.dir_name()))?;
    }
    let written = commit(files)?;
    info!(
        groups = groups.len(),
        files = written.paths.len(),
        duration_ms = start.elapsed().as_millis(),
        "sex partition written"
    );
    Ok(written)
}

/// Creates `dir` and any missing parents. Existing directories are fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Fails when `dir` exists and has at least one entry.
pub fn ensure_empty_or_absent(dir: &Path) -> Result<()> {
    match fs::read_dir(dir) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                return Err(OutputError::DirectoryNotEmpty {
                    path: dir.to_path_buf(),
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(OutputError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Writes `bytes` to `<path>.partial`, then renames it over `path`.
pub fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let partial = partial_path(path);
    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Err(source) = fs::write(&partial, bytes) {
        let _ = fs::remove_file(&partial);
        return Err(write_error(source));
    }
    if let Err(source) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(write_error(source));
    }
    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

fn commit(files: Vec<PendingFile>) -> Result<WrittenFiles> {
    let mut written = WrittenFiles::default();
    for file in files {
        write_replacing(&file.path, &file.bytes)?;
        written.paths.push(file.path);
    }
    Ok(written)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}
