//! `harmonize-inputs`: keep only subjects present in covariates, phenotypes
//! and the genotype sample list.

use anyhow::Result;
use clap::Parser;

use cohort_cli::cli::HarmonizeCli;
use cohort_cli::commands::{HarmonizeOutcome, ensure_dry_run_overlap, run_harmonize};
use cohort_cli::config::{FileConfig, HarmonizeSettings};
use cohort_cli::logging::init_logging;
use cohort_cli::report::{DRY_RUN_OK, print_dry_run, print_harmonize_summary};

fn main() {
    let cli = HarmonizeCli::parse();
    cli.logging.color.write_global();
    if let Err(error) = init_logging(&cli.logging.log_config()) {
        eprintln!("ERROR: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("ERROR: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &HarmonizeCli) -> Result<()> {
    let file = FileConfig::load_optional(cli.config.as_deref())?;
    let settings = HarmonizeSettings::resolve(cli, &file);
    match run_harmonize(&settings)? {
        HarmonizeOutcome::DryRun(counts) => {
            print_dry_run(&counts);
            ensure_dry_run_overlap(&counts)?;
            println!("{DRY_RUN_OK}");
        }
        HarmonizeOutcome::Written {
            summary,
            outdir,
            files,
        } => print_harmonize_summary(&summary, &outdir, &files),
    }
    Ok(())
}
