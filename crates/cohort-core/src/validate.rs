//! Required-column checks.

use std::fmt;

use polars::prelude::DataFrame;

use cohort_model::{column_names, has_column};

use crate::error::{CohortError, Result};

/// Which input a table came from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Covariates,
    Phenotypes,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableRole::Covariates => "covariate",
            TableRole::Phenotypes => "phenotype",
        })
    }
}

/// Splits a comma-separated column list, trimming names and dropping empties.
pub fn parse_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// `[id_col] ++ extra` without repeats, keeping first-mention order.
pub fn required_column_list(id_col: &str, extra: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(extra.len() + 1);
    for name in std::iter::once(id_col).chain(extra.iter().map(String::as_str)) {
        let name = name.trim();
        if !name.is_empty() && !columns.iter().any(|existing| existing == name) {
            columns.push(name.to_string());
        }
    }
    columns
}

/// Fails on the first required column that the table lacks.
pub fn require_columns(df: &DataFrame, role: TableRole, required: &[String]) -> Result<()> {
    for column in required {
        let column = column.trim();
        if column.is_empty() || has_column(df, column) {
            continue;
        }
        return Err(CohortError::MissingColumn {
            role,
            column: column.to_string(),
            present: column_names(df),
        });
    }
    Ok(())
}
