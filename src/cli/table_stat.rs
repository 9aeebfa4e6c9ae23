use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP};

#[derive(Clone, Args)]
#[clap(author, about, 
    after_help = &**AFTER_HELP)]
pub struct TableStatSettings {
    /// Input rule table file (JSON)
    #[clap(required = true)]
    #[clap(short = 't')]
    #[clap(long = "table")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_table_stat_settings(settings: TableStatSettings) -> TableStatSettings {
    // dump stuff to the logger
    check_required_filename(&settings.input_table, "Rule table JSON");
    
    info!("Input rule table: {:?}", &settings.input_table);
    
    settings
}
