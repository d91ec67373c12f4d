//! CLI library components for the cohort preprocessing tools.
//!
//! Both binaries (`harmonize-inputs` and `split-by-sex`) are thin wrappers:
//! they parse flags, merge an optional TOML config, initialize logging and
//! hand resolved settings to [`commands`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod report;
