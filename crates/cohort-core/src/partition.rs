//! Splitting a harmonized covariate/phenotype pair by sex code.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::{info, info_span};

use cohort_model::{IdentifierSet, SexCodes, SexGroup, SexSplitSummary};

use crate::error::Result;
use crate::normalize::{normalize_ids, trim_column};
use crate::validate::{TableRole, require_columns};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSettings {
    pub id_col: String,
    pub sex_col: String,
    pub codes: SexCodes,
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            id_col: "ID".to_string(),
            sex_col: "sex".to_string(),
            codes: SexCodes::default(),
        }
    }
}

/// One sex group's IDs and table subsets.
#[derive(Debug, Clone)]
pub struct SexSubset {
    pub group: SexGroup,
    pub ids: IdentifierSet,
    pub covariates: DataFrame,
    pub phenotypes: DataFrame,
}

/// Disjoint male/female/unknown split of a covariate/phenotype pair.
#[derive(Debug, Clone)]
pub struct SexPartition {
    pub male: SexSubset,
    pub female: SexSubset,
    pub unknown: SexSubset,
    pub total_covariate_rows: usize,
    pub codes: SexCodes,
}

impl SexPartition {
    pub fn group(&self, group: SexGroup) -> &SexSubset {
        match group {
            SexGroup::Male => &self.male,
            SexGroup::Female => &self.female,
            SexGroup::Unknown => &self.unknown,
        }
    }

    pub fn summary(&self) -> SexSplitSummary {
        SexSplitSummary {
            male_code: self.codes.male.clone(),
            female_code: self.codes.female.clone(),
            total_covariate_rows: self.total_covariate_rows,
            male_ids: self.male.ids.len(),
            female_ids: self.female.ids.len(),
            unknown_ids: self.unknown.ids.len(),
            male_phenotype_rows: self.male.phenotypes.height(),
            female_phenotype_rows: self.female.phenotypes.height(),
            unknown_phenotype_rows: self.unknown.phenotypes.height(),
        }
    }
}

/// Partitions covariate IDs by the sex value of each ID's first row, then
/// splits phenotype rows by membership in those groups.
///
/// Every distinct non-blank covariate ID lands in exactly one group. A
/// covariate ID with no phenotype row simply contributes no phenotype rows.
pub fn partition_by_sex(
    covariates: &DataFrame,
    phenotypes: &DataFrame,
    settings: &PartitionSettings,
) -> Result<SexPartition> {
    let span = info_span!("partition_by_sex", sex_col = %settings.sex_col);
    let _guard = span.enter();

    let id_col = settings.id_col.trim();
    let sex_col = settings.sex_col.trim();
    require_columns(
        covariates,
        TableRole::Covariates,
        &[id_col.to_string(), sex_col.to_string()],
    )?;
    require_columns(phenotypes, TableRole::Phenotypes, &[id_col.to_string()])?;

    let mut normalized = normalize_ids(covariates, id_col)?;
    let sexes = trim_column(&mut normalized.frame, sex_col)?;
    let assignments: Vec<SexGroup> = sexes
        .iter()
        .map(|sex| settings.codes.classify(sex.as_deref()))
        .collect();
    let ids = cohort_model::trimmed_values(&normalized.frame, id_col)?;

    let mut phenotypes = phenotypes.clone();
    let phenotype_ids = trim_column(&mut phenotypes, id_col)?;

    let subset = |group: SexGroup| -> Result<SexSubset> {
        let group_ids: IdentifierSet = ids
            .iter()
            .zip(&assignments)
            .filter(|(_, assigned)| **assigned == group)
            .filter_map(|(id, _)| id.as_deref())
            .collect();
        let covariate_mask: Vec<bool> = assignments.iter().map(|a| *a == group).collect();
        let phenotype_mask: Vec<bool> = phenotype_ids
            .iter()
            .map(|id| id.as_deref().is_some_and(|id| group_ids.contains(id)))
            .collect();
        let subset = SexSubset {
            group,
            covariates: normalized.frame.filter(&BooleanChunked::from_slice(
                "sex_group".into(),
                &covariate_mask,
            ))?,
            phenotypes: phenotypes.filter(&BooleanChunked::from_slice(
                "sex_group".into(),
                &phenotype_mask,
            ))?,
            ids: group_ids,
        };
        info!(
            group = %group,
            ids = subset.ids.len(),
            covariate_rows = subset.covariates.height(),
            phenotype_rows = subset.phenotypes.height(),
            "sex group partitioned"
        );
        Ok(subset)
    };

    Ok(SexPartition {
        male: subset(SexGroup::Male)?,
        female: subset(SexGroup::Female)?,
        unknown: subset(SexGroup::Unknown)?,
        total_covariate_rows: covariates.height(),
        codes: settings.codes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CohortError;
    use cohort_model::{string_frame, trimmed_values};
    use proptest::prelude::*;

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn covariates(rows: &[(&str, &str)]) -> DataFrame {
        string_frame(vec![
            ("ID".to_string(), rows.iter().map(|(id, _)| cell(id)).collect()),
            (
                "sex".to_string(),
                rows.iter()
                    .map(|(_, sex)| if sex.is_empty() { None } else { cell(sex) })
                    .collect(),
            ),
        ])
        .unwrap()
    }

    fn phenotypes(ids: &[&str]) -> DataFrame {
        string_frame(vec![
            ("ID".to_string(), ids.iter().map(|id| cell(id)).collect()),
            ("WMH".to_string(), ids.iter().map(|_| cell("0.1")).collect()),
        ])
        .unwrap()
    }

    fn sorted_ids(set: &IdentifierSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn splits_by_configured_codes() {
        let partition = partition_by_sex(
            &covariates(&[("1", "1"), ("2", "2"), ("3", "9")]),
            &phenotypes(&["1", "2", "3"]),
            &PartitionSettings::default(),
        )
        .unwrap();

        assert_eq!(sorted_ids(&partition.male.ids), vec!["1"]);
        assert_eq!(sorted_ids(&partition.female.ids), vec!["2"]);
        assert_eq!(sorted_ids(&partition.unknown.ids), vec!["3"]);
        assert_eq!(partition.male.phenotypes.height(), 1);
        assert_eq!(partition.unknown.phenotypes.height(), 1);
    }

    #[test]
    fn blank_sex_is_unknown() {
        let partition = partition_by_sex(
            &covariates(&[("1", ""), ("2", " 2 ")]),
            &phenotypes(&["1", "2"]),
            &PartitionSettings::default(),
        )
        .unwrap();
        assert_eq!(sorted_ids(&partition.unknown.ids), vec!["1"]);
        assert_eq!(sorted_ids(&partition.female.ids), vec!["2"]);
    }

    #[test]
    fn missing_phenotype_rows_are_not_an_error() {
        let partition = partition_by_sex(
            &covariates(&[("1", "1"), ("2", "1")]),
            &phenotypes(&["2"]),
            &PartitionSettings::default(),
        )
        .unwrap();
        assert_eq!(partition.male.ids.len(), 2);
        assert_eq!(partition.male.covariates.height(), 2);
        assert_eq!(partition.male.phenotypes.height(), 1);
        assert_eq!(partition.female.covariates.height(), 0);
    }

    #[test]
    fn duplicate_id_follows_first_row() {
        let partition = partition_by_sex(
            &covariates(&[("1", "1"), ("1", "2")]),
            &phenotypes(&["1"]),
            &PartitionSettings::default(),
        )
        .unwrap();
        assert_eq!(sorted_ids(&partition.male.ids), vec!["1"]);
        assert!(partition.female.ids.is_empty());
        assert_eq!(partition.summary().total_covariate_rows, 2);
    }

    #[test]
    fn custom_codes_and_columns() {
        let covariates = string_frame(vec![
            ("IID".to_string(), vec![cell("a"), cell("b")]),
            ("gender".to_string(), vec![cell("M"), cell("F")]),
        ])
        .unwrap();
        let phenotypes = string_frame(vec![("IID".to_string(), vec![cell("a"), cell("b")])])
            .unwrap();
        let settings = PartitionSettings {
            id_col: "IID".to_string(),
            sex_col: "gender".to_string(),
            codes: SexCodes::new("M", "F"),
        };
        let partition = partition_by_sex(&covariates, &phenotypes, &settings).unwrap();
        assert_eq!(sorted_ids(&partition.male.ids), vec!["a"]);
        assert_eq!(sorted_ids(&partition.female.ids), vec!["b"]);
        let summary = partition.summary();
        assert_eq!(summary.male_code, "M");
        assert_eq!(summary.female_phenotype_rows, 1);
    }

    #[test]
    fn missing_sex_column_fails() {
        let covariates = string_frame(vec![("ID".to_string(), vec![cell("1")])]).unwrap();
        let err = partition_by_sex(
            &covariates,
            &phenotypes(&["1"]),
            &PartitionSettings::default(),
        )
        .unwrap_err();
        match err {
            CohortError::MissingColumn { column, .. } => assert_eq!(column, "sex"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn covariate_subsets_keep_trimmed_values() {
        let partition = partition_by_sex(
            &covariates(&[(" 1 ", " 1")]),
            &phenotypes(&[" 1"]),
            &PartitionSettings::default(),
        )
        .unwrap();
        assert_eq!(
            trimmed_values(&partition.male.covariates, "sex").unwrap(),
            vec![cell("1")]
        );
        assert_eq!(partition.male.phenotypes.height(), 1);
    }

    proptest! {
        #[test]
        fn groups_are_disjoint_and_complete(
            rows in proptest::collection::vec(("[a-f]", "(1|2|9|)"), 0..24),
        ) {
            let rows: Vec<(&str, &str)> =
                rows.iter().map(|(id, sex)| (id.as_str(), sex.as_str())).collect();
            let ids: Vec<&str> = rows.iter().map(|(id, _)| *id).collect();
            let partition = partition_by_sex(
                &covariates(&rows),
                &phenotypes(&ids),
                &PartitionSettings::default(),
            )
            .unwrap();

            let all: IdentifierSet = ids.iter().copied().collect();
            let summary = partition.summary();
            prop_assert_eq!(summary.total_ids(), all.len());
            for id in all.iter() {
                let hits = SexGroup::ALL
                    .iter()
                    .filter(|group| partition.group(**group).ids.contains(id))
                    .count();
                prop_assert_eq!(hits, 1);
            }
        }
    }
}
