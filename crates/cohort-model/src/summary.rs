//! Immutable run summaries.

/// Counts produced by a successful harmonization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarmonizationSummary {
    pub covariates_unique_ids: usize,
    pub phenotypes_unique_ids: usize,
    pub vcf_unique_ids: usize,
    pub common_ids: usize,
    pub covariates_rows_written: usize,
    pub phenotypes_rows_written: usize,
}

impl HarmonizationSummary {
    /// Key/value pairs in summary-file order.
    pub fn entries(&self) -> [(&'static str, usize); 6] {
        [
            ("covariates_unique_ids", self.covariates_unique_ids),
            ("phenotypes_unique_ids", self.phenotypes_unique_ids),
            ("vcf_unique_ids", self.vcf_unique_ids),
            ("common_ids", self.common_ids),
            ("covariates_rows_written", self.covariates_rows_written),
            ("phenotypes_rows_written", self.phenotypes_rows_written),
        ]
    }
}

/// Counts produced by the sex partitioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexSplitSummary {
    pub male_code: String,
    pub female_code: String,
    pub total_covariate_rows: usize,
    pub male_ids: usize,
    pub female_ids: usize,
    pub unknown_ids: usize,
    pub male_phenotype_rows: usize,
    pub female_phenotype_rows: usize,
    pub unknown_phenotype_rows: usize,
}

impl SexSplitSummary {
    /// Human-readable summary lines, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total covariate rows: {}", self.total_covariate_rows),
            format!("Male ({}) IDs: {}", self.male_code, self.male_ids),
            format!("Female ({}) IDs: {}", self.female_code, self.female_ids),
            format!("Unknown/other IDs: {}", self.unknown_ids),
            format!("Male phenotypes rows: {}", self.male_phenotype_rows),
            format!("Female phenotypes rows: {}", self.female_phenotype_rows),
        ]
    }

    pub fn total_ids(&self) -> usize {
        self.male_ids + self.female_ids + self.unknown_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmonization_entries_follow_file_order() {
        let summary = HarmonizationSummary {
            covariates_unique_ids: 5,
            phenotypes_unique_ids: 4,
            vcf_unique_ids: 6,
            common_ids: 3,
            covariates_rows_written: 3,
            phenotypes_rows_written: 3,
        };
        let keys: Vec<&str> = summary.entries().iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec![
                "covariates_unique_ids",
                "phenotypes_unique_ids",
                "vcf_unique_ids",
                "common_ids",
                "covariates_rows_written",
                "phenotypes_rows_written",
            ]
        );
    }

    #[test]
    fn sex_split_lines_label_codes() {
        let summary = SexSplitSummary {
            male_code: "M".to_string(),
            female_code: "F".to_string(),
            total_covariate_rows: 4,
            male_ids: 1,
            female_ids: 2,
            unknown_ids: 1,
            male_phenotype_rows: 1,
            female_phenotype_rows: 2,
            unknown_phenotype_rows: 0,
        };
        let lines = summary.lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "Male (M) IDs: 1");
        assert_eq!(lines[2], "Female (F) IDs: 2");
        assert_eq!(summary.total_ids(), 4);
    }
}
