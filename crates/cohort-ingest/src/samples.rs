//! Genotype sample ID lists.

use std::path::Path;

use tracing::debug;

use cohort_model::IdentifierSet;

use crate::error::{IngestError, Result};

/// Reads a newline-delimited sample ID file. Lines are trimmed and blank
/// lines skipped; repeated IDs collapse into one.
pub fn read_sample_ids(path: &Path) -> Result<IdentifierSet> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::from_io(path, e))?;
    let ids = IdentifierSet::from_lines(&text);
    debug!(path = %path.display(), sample_count = ids.len(), "read sample ids");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_sample_ids() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "s1\n  s2 \n\ns1\n").unwrap();
        let ids = read_sample_ids(file.path()).unwrap();
        assert_eq!(ids.iter().collect::<Vec<_>>(), vec!["s1", "s2"]);
    }

    #[test]
    fn test_missing_sample_file() {
        let result = read_sample_ids(Path::new("/nonexistent/samples.txt"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
