//! In-memory rendering of tables and ID lists.

use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use crate::error::{OutputError, Result};

/// Renders a table as tab-delimited text with a header row. Nulls become
/// empty fields.
pub fn render_tsv(df: &DataFrame, name: &str) -> Result<Vec<u8>> {
    let mut frame = df.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b'\t')
        .finish(&mut frame)
        .map_err(|e| OutputError::Render {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    Ok(buffer)
}

/// One identifier per line, each line newline-terminated.
pub fn render_id_list<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<u8> {
    let mut out = String::new();
    for id in ids {
        out.push_str(id);
        out.push('\n');
    }
    out.into_bytes()
}
