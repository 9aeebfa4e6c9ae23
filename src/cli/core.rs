
use clap::{Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use log::error;
use std::path::Path;

use crate::cli::analyze::AnalyzeSettings;
use crate::cli::table_build::BuildSettings;
use crate::cli::table_stat::TableStatSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `1.0.0-6bb9635-dirty` - while on a dirty branch
    /// * `1.0.0-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown")
    );

    /// Shared after help string containing the legalese.
    pub static ref AFTER_HELP: String = format!("Copyright (C) 2024-{}     PharmaGuard contributors
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year());
}

#[derive(Parser)]
#[clap(author, 
    version = &**FULL_VERSION, 
    about, 
    after_help = &**AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// PharmaGuard, a tool for classifying drug risk from PGx variant calls.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a diplotype from a VCF and classify risk for one or more drugs
    Analyze(Box<AnalyzeSettings>),
    /// Write the built-in rule table to a file
    Build(Box<BuildSettings>),
    /// Generate statistics about a rule table file
    TableStat(Box<TableStatSettings>),
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) {
    if !filename.exists() {
        error!("{} does not exist: \"{}\"", label, filename.display());
        std::process::exit(exitcode::NOINPUT);
    } else {
        // file exists, we're good
    }
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_optional_filename(opt_filename: Option<&Path>, label: &str) {
    if let Some(filename) = opt_filename {
        check_required_filename(filename, label);
    }
}

/// Converts the repeated `-v` count into a log level
/// # Arguments
/// * `verbosity` - number of times `-v` was given
pub fn verbosity_filter(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_filter() {
        assert_eq!(verbosity_filter(0), log::LevelFilter::Info);
        assert_eq!(verbosity_filter(1), log::LevelFilter::Debug);
        assert_eq!(verbosity_filter(2), log::LevelFilter::Trace);
        assert_eq!(verbosity_filter(9), log::LevelFilter::Trace);
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from([
            "pharmaguard", "analyze",
            "--vcf", "sample.vcf",
            "--drug", "clopidogrel",
            "--drug", "CODEINE",
            "--output", "out.json",
            "-vv"
        ]);
        match cli.command {
            Commands::Analyze(settings) => {
                assert_eq!(settings.drugs, vec!["clopidogrel".to_string(), "CODEINE".to_string()]);
                assert_eq!(settings.verbosity, 2);
                assert!(settings.rule_table.is_none());
                assert!(!settings.allow_empty_table);
                assert_eq!(settings.patient_id, "PATIENT_UNKNOWN");
            },
            _ => panic!("expected analyze subcommand")
        }
    }
}
