//! Text-typed table loading with delimiter fallback.

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::{Column, CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, warn};

use cohort_model::string_frame;

use crate::delimiter::{Delimiter, read_header_line, sniff_delimiter};
use crate::error::{IngestError, Result};

/// A loaded table and the delimiter that parsed it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub frame: DataFrame,
    pub delimiter: Delimiter,
}

impl LoadedTable {
    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Reads a delimited table whose separator is sniffed from the header line.
///
/// Falls back to whitespace splitting when the sniffed parse fails
/// structurally: the reader errors, or it produces a single column whose
/// name still contains whitespace.
pub fn read_table(path: &Path) -> Result<LoadedTable> {
    let header = read_header_line(path)?;
    let sniffed = sniff_delimiter(&header);

    let primary_error = match read_delimited(path, sniffed) {
        Ok(frame) if !header_unsplit(&frame) => {
            return Ok(loaded(path, frame, sniffed));
        }
        Ok(_) => format!("{sniffed} parse left the header unsplit"),
        Err(IngestError::Parse { message, .. }) => message,
        Err(error) => error.to_string(),
    };

    warn!(
        path = %path.display(),
        delimiter = %sniffed,
        reason = %primary_error,
        "falling back to whitespace-delimited parse"
    );
    match read_whitespace(path) {
        Ok(frame) => Ok(loaded(path, frame, Delimiter::Whitespace)),
        Err(fallback_error) => {
            let fallback_error = match fallback_error {
                IngestError::Parse { message, .. } => message,
                other => other.to_string(),
            };
            Err(IngestError::Parse {
                path: path.to_path_buf(),
                message: format!("{primary_error}; whitespace fallback: {fallback_error}"),
            })
        }
    }
}

/// Reads a table with a fixed delimiter and no fallback.
pub fn read_table_with(path: &Path, delimiter: Delimiter) -> Result<LoadedTable> {
    read_header_line(path)?;
    let frame = match delimiter {
        Delimiter::Whitespace => read_whitespace(path)?,
        _ => read_delimited(path, delimiter)?,
    };
    Ok(loaded(path, frame, delimiter))
}

fn loaded(path: &Path, frame: DataFrame, delimiter: Delimiter) -> LoadedTable {
    debug!(
        path = %path.display(),
        delimiter = %delimiter,
        rows = frame.height(),
        columns = frame.width(),
        "loaded table"
    );
    LoadedTable { frame, delimiter }
}

fn read_delimited(path: &Path, delimiter: Delimiter) -> Result<DataFrame> {
    let Some(separator) = delimiter.byte() else {
        return read_whitespace(path);
    };
    // A zero-length schema inference window keeps every column as String.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| parse_error(path, e))?
        .finish()
        .map_err(|e| parse_error(path, e))?;
    let df = drop_blank_rows(path, df)?;
    normalize_headers(path, &df)
}

/// Drops rows with no value in any column; the CSV reader yields one for
/// every blank line.
fn drop_blank_rows(path: &Path, df: DataFrame) -> Result<DataFrame> {
    let mut columns = df.get_columns().iter();
    let Some(first) = columns.next() else {
        return Ok(df);
    };
    let mask = columns.fold(first.is_not_null(), |mask, column| {
        &mask | &column.is_not_null()
    });
    if mask.all() {
        return Ok(df);
    }
    let filtered = df.filter(&mask).map_err(|e| parse_error(path, e))?;
    debug!(
        path = %path.display(),
        dropped = df.height() - filtered.height(),
        "dropped blank lines"
    );
    Ok(filtered)
}

fn read_whitespace(path: &Path) -> Result<DataFrame> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    };
    let header_line = header_line.strip_prefix('\u{feff}').unwrap_or(header_line);
    let headers: Vec<String> = header_line
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (index, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != headers.len() {
            return Err(IngestError::Parse {
                path: path.to_path_buf(),
                message: format!(
                    "line {} has {} fields, expected {}",
                    index + 1,
                    fields.len(),
                    headers.len()
                ),
            });
        }
        for (column, field) in values.iter_mut().zip(fields) {
            column.push(Some(field.to_string()));
        }
    }

    ensure_unique_headers(path, &headers)?;
    let frame = string_frame(headers.into_iter().zip(values).collect())
        .map_err(|e| parse_error(path, e))?;
    Ok(frame)
}

/// Trims header names and rejects duplicates produced by trimming.
fn normalize_headers(path: &Path, df: &DataFrame) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().trim_matches('\u{feff}').to_string())
        .collect();
    ensure_unique_headers(path, &names)?;
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(&names)
        .map(|(column, name)| column.clone().with_name(name.as_str().into()))
        .collect();
    DataFrame::new(columns).map_err(|e| parse_error(path, e))
}

fn ensure_unique_headers(path: &Path, names: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if name.is_empty() {
            return Err(IngestError::Parse {
                path: path.to_path_buf(),
                message: "header contains an empty column name".to_string(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(IngestError::Parse {
                path: path.to_path_buf(),
                message: format!("duplicate column name '{name}'"),
            });
        }
    }
    Ok(())
}

fn header_unsplit(df: &DataFrame) -> bool {
    df.width() == 1
        && df
            .get_column_names()
            .first()
            .is_some_and(|name| name.split_whitespace().count() > 1)
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> IngestError {
    IngestError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
