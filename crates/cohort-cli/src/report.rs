//! Console reporting: dry-run lines and post-run summary tables.

use std::path::{Path, PathBuf};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cohort_core::CohortCounts;
use cohort_model::{HarmonizationSummary, SexSplitSummary};
use cohort_output::WrittenFiles;

pub const DRY_RUN_OK: &str =
    "[dry-run] Strong dry-run OK: overlap is non-zero. No outputs will be written.";

/// The four count lines every dry run prints, in order.
pub fn dry_run_lines(counts: &CohortCounts) -> Vec<String> {
    vec![
        format!("[dry-run] covariates_unique_ids={}", counts.covariates_unique_ids),
        format!("[dry-run] phenotypes_unique_ids={}", counts.phenotypes_unique_ids),
        format!("[dry-run] genotype_unique_ids={}", counts.genotype_unique_ids),
        format!("[dry-run] common_ids={}", counts.common_ids),
    ]
}

pub fn print_dry_run(counts: &CohortCounts) {
    for line in dry_run_lines(counts) {
        println!("{line}");
    }
}

pub fn harmonize_table(summary: &HarmonizationSummary) -> Table {
    let mut table = count_table();
    for (key, value) in summary.entries() {
        table.add_row(vec![Cell::new(key), count_cell(value)]);
    }
    table
}

pub fn split_table(summary: &SexSplitSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("IDs"),
        header_cell("Phenotype rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(format!("male ({})", summary.male_code)),
        count_cell(summary.male_ids),
        count_cell(summary.male_phenotype_rows),
    ]);
    table.add_row(vec![
        Cell::new(format!("female ({})", summary.female_code)),
        count_cell(summary.female_ids),
        count_cell(summary.female_phenotype_rows),
    ]);
    table.add_row(vec![
        Cell::new("unknown/other"),
        count_cell(summary.unknown_ids),
        count_cell(summary.unknown_phenotype_rows),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_ids()).add_attribute(Attribute::Bold),
        Cell::new(format!("{} covariate rows", summary.total_covariate_rows))
            .add_attribute(Attribute::Dim),
    ]);
    table
}

pub fn print_harmonize_summary(summary: &HarmonizationSummary, outdir: &Path, files: &WrittenFiles) {
    println!("Output: {}", outdir.display());
    println!("{}", harmonize_table(summary));
    print_files(&files.paths);
}

pub fn print_split_summary(summary: &SexSplitSummary, outdir: &Path, files: &WrittenFiles) {
    println!("Output: {}", outdir.display());
    println!("{}", split_table(summary));
    print_files(&files.paths);
}

fn print_files(paths: &[PathBuf]) {
    println!("Files:");
    for path in paths {
        println!("- {}", path.display());
    }
}

fn count_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Count"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(value: usize) -> Cell {
    if value == 0 {
        Cell::new(value).fg(Color::Yellow)
    } else {
        Cell::new(value)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
