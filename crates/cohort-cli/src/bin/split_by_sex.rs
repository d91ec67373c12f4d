//! `split-by-sex`: split covariate/phenotype TSVs into per-sex datasets.

use anyhow::Result;
use clap::Parser;

use cohort_cli::cli::SplitCli;
use cohort_cli::commands::run_sex_split;
use cohort_cli::config::{FileConfig, SplitSettings};
use cohort_cli::logging::init_logging;
use cohort_cli::report::print_split_summary;

fn main() {
    let cli = SplitCli::parse();
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

fn run(cli: &SplitCli) -> Result<()> {
    let file = FileConfig::load_optional(cli.config.as_deref())?;
    let settings = SplitSettings::resolve(cli, &file);
    let outcome = run_sex_split(&settings)?;
    print_split_summary(&outcome.summary, &outcome.outdir, &outcome.files);
    Ok(())
}
