//! CLI argument definitions for `harmonize-inputs` and `split-by-sex`.
//!
//! Options that a config file may also supply are `Option`s here; their
//! built-in defaults are applied in [`crate::config`] so that an explicit
//! flag, a config value and the default can be told apart.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "harmonize-inputs",
    version,
    about = "Keep only subjects present in covariates, phenotypes and genotype samples",
    long_about = "Normalize covariate and phenotype tables (TSV, CSV or whitespace-delimited) \
                  and keep only IDs present in all three of: covariates, phenotypes and the \
                  genotype sample list.\n\n\
                  Writes covariates.filtered.tsv, phenotypes.filtered.tsv, keep_ids.txt and \
                  harmonization_summary.txt into the output directory."
)]
pub struct HarmonizeCli {
    /// Covariate file (TSV/CSV/whitespace) with header.
    #[arg(long = "covar", value_name = "PATH")]
    pub covar: PathBuf,

    /// Phenotype file (TSV/CSV/whitespace) with header.
    #[arg(long = "pheno", value_name = "PATH")]
    pub pheno: PathBuf,

    /// Genotype VCF (.vcf.gz recommended).
    #[arg(long = "vcf", value_name = "PATH")]
    pub vcf: PathBuf,

    /// Newline-delimited sample IDs, used instead of running the sample tool.
    #[arg(long = "sample-ids-file", value_name = "PATH")]
    pub sample_ids_file: Option<PathBuf>,

    /// Output directory.
    #[arg(long = "outdir", value_name = "DIR")]
    pub outdir: PathBuf,

    /// ID column name [default: ID].
    #[arg(long = "id-col", value_name = "NAME")]
    pub id_col: Option<String>,

    /// Sex column name in covariates [default: sex]. Accepted for symmetry
    /// with split-by-sex; not checked here.
    #[arg(long = "sex-col", value_name = "NAME")]
    pub sex_col: Option<String>,

    /// Comma-separated required covariate columns
    /// [default: ID,age,sex,PC1,PC2,PC3,PC4,PC5].
    #[arg(long = "required-covar-cols", value_name = "LIST")]
    pub required_covar_cols: Option<String>,

    /// Comma-separated required phenotype columns [default: ID].
    #[arg(long = "required-pheno-cols", value_name = "LIST")]
    pub required_pheno_cols: Option<String>,

    /// Validate and report overlap counts without writing outputs.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Sample listing program, run as `<PROGRAM> query -l <VCF>` [default: bcftools].
    #[arg(long = "sample-tool", value_name = "PROGRAM")]
    pub sample_tool: Option<String>,

    /// Seconds to wait for the sample listing tool [default: 600].
    #[arg(long = "sample-tool-timeout", value_name = "SECS")]
    pub sample_tool_timeout: Option<u64>,

    /// Refuse to write into a non-empty output directory.
    #[arg(long = "no-clobber")]
    pub no_clobber: bool,

    /// TOML file with defaults for column names, required columns and the sample tool.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[derive(Parser)]
#[command(
    name = "split-by-sex",
    version,
    about = "Split covariate/phenotype TSVs into male and female datasets by a sex column",
    long_about = "Split covariate and phenotype TSVs into data_male/ and data_female/ \
                  (and optionally data_unknown/) by the value of a sex column, and write \
                  sex_split_summary.txt."
)]
pub struct SplitCli {
    /// Covariate TSV with header including the ID and sex columns.
    #[arg(long = "covar", value_name = "PATH")]
    pub covar: PathBuf,

    /// Phenotype TSV with header including the ID column.
    #[arg(long = "pheno", value_name = "PATH")]
    pub pheno: PathBuf,

    /// Output directory (data_male/ and data_female/ are created inside).
    #[arg(long = "outdir", value_name = "DIR")]
    pub outdir: PathBuf,

    /// ID column name [default: ID].
    #[arg(long = "id-col", value_name = "NAME")]
    pub id_col: Option<String>,

    /// Sex column name in covariates [default: sex].
    #[arg(long = "sex-col", value_name = "NAME")]
    pub sex_col: Option<String>,

    /// Value meaning male [default: 1].
    #[arg(long = "male-code", value_name = "CODE")]
    pub male_code: Option<String>,

    /// Value meaning female [default: 2].
    #[arg(long = "female-code", value_name = "CODE")]
    pub female_code: Option<String>,

    /// Also write data_unknown/ for IDs with other or missing sex codes.
    #[arg(long = "keep-unspecified")]
    pub keep_unspecified: bool,

    /// Refuse to write into a non-empty output directory.
    #[arg(long = "no-clobber")]
    pub no_clobber: bool,

    /// TOML file with defaults for column names and sex codes.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Logging flags shared by both binaries.
#[derive(Args)]
pub struct LoggingArgs {
    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl LoggingArgs {
    /// Build logging configuration from the flags with consistent precedence:
    /// `--log-level`, then `-v/-q`, then `RUST_LOG`, then warn.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            ..LogConfig::default()
        };
        if let Some(level) = self.log_level {
            config.level_filter = level.into();
        }
        config.format = self.log_format.into();
        config.log_file = self.log_file.clone();
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
