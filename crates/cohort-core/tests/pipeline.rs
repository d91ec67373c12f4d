//! End-to-end tests for the harmonization and partitioning pipeline,
//! loading inputs from disk the way the binaries do.

use std::fs;
use std::path::PathBuf;

use cohort_core::{
    CohortError, CohortSettings, PartitionSettings, SampleIdFile, compute_cohort, harmonize,
    partition_by_sex,
};
use cohort_ingest::{Delimiter, read_table, read_table_with};
use cohort_model::{IdentifierSet, SexGroup, trimmed_values};
use proptest::prelude::*;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write input");
    path
}

const COVARIATES: &str = "\
ID,age,sex,PC1,PC2,PC3,PC4,PC5
S3,61,2,0.1,0.2,0.3,0.4,0.5
S1,55,1,0.1,0.2,0.3,0.4,0.5
S2,70,1,0.1,0.2,0.3,0.4,0.5
S1,99,2,0.1,0.2,0.3,0.4,0.5
 ,40,2,0.1,0.2,0.3,0.4,0.5
";

const PHENOTYPES: &str = "ID\tWMH\nS2\t0.8\nS1\t1.2\nS4\t0.3\n";

#[test]
fn harmonizes_mixed_delimiter_inputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let covariates = read_table(&write(&dir, "cov.csv", COVARIATES)).expect("covariates");
    let phenotypes = read_table(&write(&dir, "phe.tsv", PHENOTYPES)).expect("phenotypes");
    let samples = SampleIdFile::new(write(&dir, "samples.txt", "S1\nS2\nS3\nS5\n"));

    let cohort = compute_cohort(
        &covariates.frame,
        &phenotypes.frame,
        &samples,
        &CohortSettings::default(),
    )
    .expect("cohort");
    let outputs = harmonize(&cohort).expect("harmonize");

    assert_eq!(outputs.keep_ids, vec!["S1", "S2"]);
    assert_eq!(
        trimmed_values(&outputs.covariates, "age").expect("age"),
        vec![Some("55".to_string()), Some("70".to_string())]
    );
    assert_eq!(
        trimmed_values(&outputs.phenotypes, "WMH").expect("WMH"),
        vec![Some("1.2".to_string()), Some("0.8".to_string())]
    );
    assert_eq!(outputs.summary.covariates_unique_ids, 3);
    assert_eq!(outputs.summary.phenotypes_unique_ids, 3);
    assert_eq!(outputs.summary.vcf_unique_ids, 4);
    assert_eq!(outputs.summary.common_ids, 2);
}

#[test]
fn missing_covariate_column_is_reported_before_samples() {
    let dir = tempfile::tempdir().expect("temp dir");
    let covariates =
        read_table(&write(&dir, "cov.tsv", "ID\tage\tsex\nS1\t50\t1\n")).expect("covariates");
    let phenotypes = read_table(&write(&dir, "phe.tsv", PHENOTYPES)).expect("phenotypes");
    // Nonexistent sample file: a failure here would mean the source was queried.
    let samples = SampleIdFile::new(dir.path().join("absent.txt"));

    let err = compute_cohort(
        &covariates.frame,
        &phenotypes.frame,
        &samples,
        &CohortSettings::default(),
    )
    .expect_err("missing PC columns");

    match err {
        CohortError::MissingColumn { column, .. } => assert_eq!(column, "PC1"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn partitions_harmonized_outputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let covariates = read_table(&write(&dir, "cov.csv", COVARIATES)).expect("covariates");
    let phenotypes = read_table(&write(
        &dir,
        "phe.tsv",
        "ID\tWMH\nS1\t1.2\nS2\t0.8\nS3\t0.5\nS9\t0.1\n",
    ))
    .expect("phenotypes");

    let partition = partition_by_sex(
        &covariates.frame,
        &phenotypes.frame,
        &PartitionSettings::default(),
    )
    .expect("partition");

    let male: Vec<&str> = partition.group(SexGroup::Male).ids.iter().collect();
    let female: Vec<&str> = partition.group(SexGroup::Female).ids.iter().collect();
    assert_eq!(male, vec!["S1", "S2"]);
    assert_eq!(female, vec!["S3"]);
    assert!(partition.unknown.ids.is_empty());

    let summary = partition.summary();
    assert_eq!(summary.total_covariate_rows, 5);
    assert_eq!(summary.male_phenotype_rows, 2);
    assert_eq!(summary.female_phenotype_rows, 1);
}

#[test]
fn blank_lines_are_not_counted_as_covariate_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let covariates = read_table_with(
        &write(&dir, "cov.tsv", "ID\tsex\n1\t1\n\n2\t2\n\n"),
        Delimiter::Tab,
    )
    .expect("covariates");
    let phenotypes = read_table_with(
        &write(&dir, "phe.tsv", "ID\tWMH\n1\t0.1\n\n2\t0.2\n"),
        Delimiter::Tab,
    )
    .expect("phenotypes");

    let summary = partition_by_sex(
        &covariates.frame,
        &phenotypes.frame,
        &PartitionSettings::default(),
    )
    .expect("partition")
    .summary();

    assert_eq!(summary.total_covariate_rows, 2);
    assert_eq!(summary.male_ids, 1);
    assert_eq!(summary.female_ids, 1);
    assert_eq!(summary.unknown_ids, 0);
    assert_eq!(summary.male_phenotype_rows + summary.female_phenotype_rows, 2);
}

proptest! {
    #[test]
    fn common_ids_ignore_row_order(
        ids in proptest::collection::vec("[A-D][0-3]", 1..16),
        samples in proptest::collection::btree_set("[A-D][0-3]", 0..10),
        rotate in 0usize..16,
    ) {
        let settings = CohortSettings {
            required_covariates: vec![],
            ..CohortSettings::default()
        };
        let table = |ids: &[String]| {
            cohort_model::string_frame(vec![(
                "ID".to_string(),
                ids.iter().cloned().map(Some).collect(),
            )])
            .expect("frame")
        };
        let mut rotated = ids.clone();
        rotated.rotate_left(rotate % ids.len());
        let samples: IdentifierSet = samples.into_iter().collect();

        let forward = compute_cohort(&table(&ids), &table(&ids), &samples, &settings)
            .expect("forward");
        let shuffled = compute_cohort(&table(&rotated), &table(&ids), &samples, &settings)
            .expect("rotated");

        prop_assert_eq!(&forward.common, &shuffled.common);
        prop_assert_eq!(forward.counts(), shuffled.counts());
    }
}
