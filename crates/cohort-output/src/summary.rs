//! Summary file formats.

use cohort_model::{HarmonizationSummary, SexSplitSummary};

/// `key\tvalue` per line, in the fixed summary order.
pub fn render_harmonization_summary(summary: &HarmonizationSummary) -> String {
    summary
        .entries()
        .iter()
        .map(|(key, value)| format!("{key}\t{value}\n"))
        .collect()
}

pub fn render_sex_split_summary(summary: &SexSplitSummary) -> String {
    summary
        .lines()
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}
