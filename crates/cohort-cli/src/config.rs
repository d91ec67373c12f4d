//! Optional TOML defaults and resolution of the effective run settings.
//!
//! Precedence, highest first: explicit flag, config file, built-in default.
//!
//! ```toml
//! id_col = "IID"
//! sex_col = "sex"
//! required_covar_cols = ["IID", "age", "sex", "PC1", "PC2"]
//! required_pheno_cols = ["IID", "WMH"]
//! male_code = "M"
//! female_code = "F"
//! sample_tool = "/opt/bcftools/bin/bcftools"
//! sample_tool_timeout = 120
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use cohort_core::{
    CohortSettings, PartitionSettings, SampleListCommand, parse_column_list,
};
use cohort_model::SexCodes;

use crate::cli::{HarmonizeCli, SplitCli};

/// Defaults read from `--config`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub id_col: Option<String>,
    pub sex_col: Option<String>,
    pub required_covar_cols: Option<Vec<String>>,
    pub required_pheno_cols: Option<Vec<String>>,
    pub male_code: Option<String>,
    pub female_code: Option<String>,
    pub sample_tool: Option<String>,
    pub sample_tool_timeout: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns empty defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Where genotype sample IDs come from for one harmonizer run.
#[derive(Debug, Clone)]
pub enum SampleSourceChoice {
    File(PathBuf),
    Command(SampleListCommand),
}

/// Effective settings for `harmonize-inputs`.
#[derive(Debug, Clone)]
pub struct HarmonizeSettings {
    pub covar: PathBuf,
    pub pheno: PathBuf,
    pub vcf: PathBuf,
    pub outdir: PathBuf,
    pub cohort: CohortSettings,
    pub sex_col: String,
    pub samples: SampleSourceChoice,
    pub dry_run: bool,
    pub no_clobber: bool,
}

impl HarmonizeSettings {
    pub fn resolve(cli: &HarmonizeCli, file: &FileConfig) -> Self {
        let defaults = CohortSettings::default();
        let required_covariates = cli
            .required_covar_cols
            .as_deref()
            .map(parse_column_list)
            .or_else(|| file.required_covar_cols.clone())
            .unwrap_or(defaults.required_covariates);
        let required_phenotypes = cli
            .required_pheno_cols
            .as_deref()
            .map(parse_column_list)
            .or_else(|| file.required_pheno_cols.clone())
            .unwrap_or(defaults.required_phenotypes);
        let cohort = CohortSettings {
            id_col: pick(&cli.id_col, &file.id_col, &defaults.id_col),
            required_covariates,
            required_phenotypes,
        };

        let samples = match &cli.sample_ids_file {
            Some(path) => SampleSourceChoice::File(path.clone()),
            None => {
                let program = pick(
                    &cli.sample_tool,
                    &file.sample_tool,
                    SampleListCommand::DEFAULT_PROGRAM,
                );
                let timeout = cli
                    .sample_tool_timeout
                    .or(file.sample_tool_timeout)
                    .map_or(SampleListCommand::DEFAULT_TIMEOUT, Duration::from_secs);
                SampleSourceChoice::Command(
                    SampleListCommand::bcftools_query(program, &cli.vcf).with_timeout(timeout),
                )
            }
        };

        Self {
            covar: cli.covar.clone(),
            pheno: cli.pheno.clone(),
            vcf: cli.vcf.clone(),
            outdir: cli.outdir.clone(),
            cohort,
            sex_col: pick(&cli.sex_col, &file.sex_col, "sex"),
            samples,
            dry_run: cli.dry_run,
            no_clobber: cli.no_clobber,
        }
    }
}

/// Effective settings for `split-by-sex`.
#[derive(Debug, Clone)]
pub struct SplitSettings {
    pub covar: PathBuf,
    pub pheno: PathBuf,
    pub outdir: PathBuf,
    pub partition: PartitionSettings,
    pub keep_unknown: bool,
    pub no_clobber: bool,
}

impl SplitSettings {
    pub fn resolve(cli: &SplitCli, file: &FileConfig) -> Self {
        let defaults = PartitionSettings::default();
        let codes = SexCodes::new(
            pick(&cli.male_code, &file.male_code, &defaults.codes.male),
            pick(&cli.female_code, &file.female_code, &defaults.codes.female),
        );
        Self {
            covar: cli.covar.clone(),
            pheno: cli.pheno.clone(),
            outdir: cli.outdir.clone(),
            partition: PartitionSettings {
                id_col: pick(&cli.id_col, &file.id_col, &defaults.id_col),
                sex_col: pick(&cli.sex_col, &file.sex_col, &defaults.sex_col),
                codes,
            },
            keep_unknown: cli.keep_unspecified,
            no_clobber: cli.no_clobber,
        }
    }
}

fn pick(flag: &Option<String>, file: &Option<String>, default: &str) -> String {
    flag.as_deref()
        .or(file.as_deref())
        .unwrap_or(default)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn harmonize_cli(extra: &[&str]) -> HarmonizeCli {
        let mut args = vec![
            "harmonize-inputs",
            "--covar",
            "cov.tsv",
            "--pheno",
            "phe.tsv",
            "--vcf",
            "geno.vcf.gz",
            "--outdir",
            "out",
        ];
        args.extend_from_slice(extra);
        HarmonizeCli::try_parse_from(args).unwrap()
    }

    #[test]
    fn parses_all_keys() {
        let config: FileConfig = toml::from_str(
            r#"
            id_col = "IID"
            sex_col = "gender"
            required_covar_cols = ["IID", "age"]
            required_pheno_cols = ["IID"]
            male_code = "M"
            female_code = "F"
            sample_tool = "bcftools-1.20"
            sample_tool_timeout = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.id_col.as_deref(), Some("IID"));
        assert_eq!(config.sample_tool_timeout, Some(30));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: std::result::Result<FileConfig, _> = toml::from_str("id_column = \"ID\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn builtin_defaults_apply() {
        let settings = HarmonizeSettings::resolve(&harmonize_cli(&[]), &FileConfig::default());
        assert_eq!(settings.cohort, CohortSettings::default());
        assert_eq!(settings.sex_col, "sex");
        match settings.samples {
            SampleSourceChoice::Command(command) => {
                assert_eq!(command.command_line(), "bcftools query -l geno.vcf.gz");
            }
            SampleSourceChoice::File(_) => panic!("expected the sample tool"),
        }
    }

    #[test]
    fn flags_beat_file_beats_default() {
        let file = FileConfig {
            id_col: Some("IID".to_string()),
            required_covar_cols: Some(vec!["IID".to_string(), "age".to_string()]),
            sample_tool: Some("bcftools-1.20".to_string()),
            ..FileConfig::default()
        };
        let settings = HarmonizeSettings::resolve(
            &harmonize_cli(&["--required-covar-cols", "IID, PC1,,"]),
            &file,
        );
        assert_eq!(settings.cohort.id_col, "IID");
        assert_eq!(settings.cohort.required_covariates, vec!["IID", "PC1"]);
        assert_eq!(settings.cohort.required_phenotypes, vec!["ID"]);
        match settings.samples {
            SampleSourceChoice::Command(command) => {
                assert!(command.command_line().starts_with("bcftools-1.20 query -l"));
            }
            SampleSourceChoice::File(_) => panic!("expected the sample tool"),
        }
    }

    #[test]
    fn sample_file_replaces_tool() {
        let settings = HarmonizeSettings::resolve(
            &harmonize_cli(&["--sample-ids-file", "ids.txt"]),
            &FileConfig::default(),
        );
        assert!(matches!(settings.samples, SampleSourceChoice::File(path) if path == Path::new("ids.txt")));
    }

    #[test]
    fn split_codes_resolve_and_trim() {
        let cli = SplitCli::try_parse_from([
            "split-by-sex",
            "--covar",
            "c",
            "--pheno",
            "p",
            "--outdir",
            "o",
            "--female-code",
            " F ",
        ])
        .unwrap();
        let file = FileConfig {
            male_code: Some("M".to_string()),
            ..FileConfig::default()
        };
        let settings = SplitSettings::resolve(&cli, &file);
        assert_eq!(settings.partition.codes, SexCodes::new("M", "F"));
        assert_eq!(settings.partition.id_col, "ID");
        assert!(!settings.keep_unknown);
    }
}
