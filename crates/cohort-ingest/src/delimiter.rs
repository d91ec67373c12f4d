//! Header-line delimiter sniffing.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{IngestError, Result};

/// Field separator a table was parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    /// Runs of spaces or tabs; only reached through the fallback parser.
    Whitespace,
}

impl Delimiter {
    /// Single-byte separator, if the delimiter has one.
    pub fn byte(self) -> Option<u8> {
        match self {
            Delimiter::Comma => Some(b','),
            Delimiter::Tab => Some(b'\t'),
            Delimiter::Whitespace => None,
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Delimiter::Comma => "comma",
            Delimiter::Tab => "tab",
            Delimiter::Whitespace => "whitespace",
        })
    }
}

/// Picks comma or tab for a header line. Ties, including a line with
/// neither, go to tab.
pub fn sniff_delimiter(header: &str) -> Delimiter {
    let commas = header.matches(',').count();
    let tabs = header.matches('\t').count();
    if commas > tabs {
        Delimiter::Comma
    } else {
        Delimiter::Tab
    }
}

/// Reads the first line of `path` and sniffs its delimiter.
pub fn detect_delimiter(path: &Path) -> Result<Delimiter> {
    let header = read_header_line(path)?;
    Ok(sniff_delimiter(&header))
}

/// First line of the file with any UTF-8 BOM removed.
pub(crate) fn read_header_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| IngestError::from_io(path, e))?;
    let cleaned = line.strip_prefix('\u{feff}').unwrap_or(&line);
    if read == 0 || cleaned.trim().is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(cleaned.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sniff_prefers_majority() {
        assert_eq!(sniff_delimiter("ID,age,sex"), Delimiter::Comma);
        assert_eq!(sniff_delimiter("ID\tage\tsex"), Delimiter::Tab);
        assert_eq!(sniff_delimiter("ID\tage,sex\tPC1"), Delimiter::Tab);
    }

    #[test]
    fn test_sniff_ties_default_to_tab() {
        assert_eq!(sniff_delimiter("ID age sex"), Delimiter::Tab);
        assert_eq!(sniff_delimiter("ID,age\tsex"), Delimiter::Tab);
        assert_eq!(sniff_delimiter(""), Delimiter::Tab);
    }

    #[test]
    fn test_detect_reads_only_first_line() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "\u{feff}ID,age\n1\t2\t3\t4\n").unwrap();
        assert_eq!(detect_delimiter(file.path()).unwrap(), Delimiter::Comma);
    }

    #[test]
    fn test_detect_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let result = detect_delimiter(file.path());
        assert!(matches!(result, Err(IngestError::EmptyFile { .. })));
    }

    #[test]
    fn test_detect_missing_file() {
        let result = detect_delimiter(Path::new("/nonexistent/covariates.tsv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
