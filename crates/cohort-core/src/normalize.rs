//! Identifier normalization: trim, drop blanks, first occurrence wins.

use std::collections::BTreeSet;

use polars::prelude::{BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series};
use tracing::debug;

use cohort_model::{IdentifierSet, trimmed_values};

use crate::error::Result;

/// Row bookkeeping from [`normalize_ids`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub input_rows: usize,
    pub blank_ids_dropped: usize,
    pub duplicates_dropped: usize,
}

/// A table whose identifier column is trimmed, non-empty and unique.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub frame: DataFrame,
    pub ids: IdentifierSet,
    pub stats: NormalizeStats,
}

impl NormalizedTable {
    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Trims `id_col`, drops rows with a blank identifier and keeps only the
/// first row seen for each identifier. Surviving rows keep input order.
///
/// The caller must have checked that `id_col` exists.
pub fn normalize_ids(df: &DataFrame, id_col: &str) -> Result<NormalizedTable> {
    let mut frame = df.clone();
    let ids = trim_column(&mut frame, id_col)?;

    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(ids.len());
    let mut stats = NormalizeStats {
        input_rows: ids.len(),
        ..NormalizeStats::default()
    };
    for id in &ids {
        match id {
            None => {
                stats.blank_ids_dropped += 1;
                keep.push(false);
            }
            Some(id) => {
                let first = seen.insert(id.as_str());
                if !first {
                    stats.duplicates_dropped += 1;
                }
                keep.push(first);
            }
        }
    }
    let ids: IdentifierSet = seen.into_iter().collect();

    let mask = BooleanChunked::from_slice("normalize".into(), &keep);
    let frame = frame.filter(&mask)?;
    debug!(
        id_col,
        input_rows = stats.input_rows,
        blank_ids_dropped = stats.blank_ids_dropped,
        duplicates_dropped = stats.duplicates_dropped,
        unique_ids = ids.len(),
        "normalized identifiers"
    );
    Ok(NormalizedTable { frame, ids, stats })
}

/// Replaces `name` with its trimmed values (blanks become null) and returns them.
pub(crate) fn trim_column(df: &mut DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = trimmed_values(df, name)?;
    df.with_column(Series::new(name.into(), values.clone()))?;
    Ok(values)
}
