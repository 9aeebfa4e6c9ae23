use log::{error, info, warn};

use pharmaguard::cli::analyze::{AnalyzeSettings, check_analyze_settings};
use pharmaguard::cli::core::{Commands, get_cli, verbosity_filter};
use pharmaguard::cli::table_build::{BuildSettings, check_build_settings};
use pharmaguard::cli::table_stat::{TableStatSettings, check_table_stat_settings};
use pharmaguard::data_types::pharmaguard_json::PharmaguardJson;
use pharmaguard::database::db_const::normalize_drug_name;
use pharmaguard::database::rule_table::RuleTable;
use pharmaguard::errors::ErrorClass;
use pharmaguard::util::file_io::{load_text, save_json};

/// Sets up the logger once, before anything else happens
/// # Arguments
/// * `verbosity` - the number of `-v` flags
fn init_logging(verbosity: u8) {
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(verbosity_filter(verbosity))
        .init();
}

/// This will run the "build" mode of the tool
/// # Arguments
/// * `settings` - the BuildSettings object
fn run_build(settings: BuildSettings) {
    // immediately setup logging first
    init_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: BuildSettings = check_build_settings(settings);

    let rule_table = RuleTable::builtin();
    if let Err(e) = rule_table.validate() {
        error!("Error while validating built-in rule table: {e}");
        std::process::exit(exitcode::SOFTWARE);
    }

    info!("Saving rule table to {:?}", cli_settings.output_table);
    match save_json(&rule_table, &cli_settings.output_table) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while writing rule table to file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
}

/// This will run the "analyze" mode of the tool
/// # Arguments
/// * `settings` - the AnalyzeSettings object
fn run_analyze(settings: AnalyzeSettings) {
    // immediately setup logging first
    init_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: AnalyzeSettings = match check_analyze_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    // first load the rule table, this is the only time we touch it on disk
    let rule_table: RuleTable = match cli_settings.rule_table.as_ref() {
        Some(table_fn) => {
            info!("Loading rule table from {:?}...", table_fn);
            match RuleTable::load(table_fn, cli_settings.table_load_policy()) {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Error while loading rule table file: {e}");
                    std::process::exit(exitcode::IOERR);
                }
            }
        },
        None => {
            info!("Using built-in rule table");
            RuleTable::builtin()
        }
    };
    if rule_table.is_empty() {
        warn!("Rule table is empty, every phenotype and risk will be reported as Unknown");
    }

    info!("Loading VCF from {:?}...", cli_settings.vcf_filename);
    let vcf_text: String = match load_text(&cli_settings.vcf_filename) {
        Ok(t) => t,
        Err(e) => {
            error!("Error while loading VCF file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // each drug is an independent analysis against the same input, failures are recorded and reported at the end
    let mut results = PharmaguardJson::new(rule_table.table_metadata().clone(), &cli_settings.patient_id);
    for drug in cli_settings.drugs.iter() {
        let insert_result = match pharmaguard::diplotyper::analyze_drug(&rule_table, &vcf_text, drug) {
            Ok(drug_result) => {
                let profile = drug_result.pharmacogenomic_profile();
                let risk = drug_result.risk_assessment();
                info!("\t{}: {} {} => {} => {} ({})", drug_result.drug(), profile.gene(), profile.diplotype(), profile.phenotype(), risk.risk_label, risk.severity);
                results.insert(drug_result)
            },
            Err(e) => {
                error!("Error while analyzing {drug} ({}): {e}", e.class());
                results.insert_failure(&normalize_drug_name(drug), &e)
            }
        };
        if let Err(e) = insert_result {
            error!("Error while saving result for {drug}: {e}");
            std::process::exit(exitcode::SOFTWARE);
        }
    }

    info!("Saving analysis to {:?}", cli_settings.output_filename);
    match save_json(&results, &cli_settings.output_filename) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while writing analysis to file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    if let Some(filename) = cli_settings.output_tsv.as_ref() {
        info!("Saving summary TSV to {:?}", filename);
        match results.save_summary_tsv(filename) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while writing summary TSV to file: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }

    // outputs are written either way, but a failed drug means a failed run
    if let Some(class) = results.failure_class() {
        error!("{} of {} drug(s) could not be analyzed, see drug_failures in {:?}", results.drug_failures().len(), cli_settings.drugs.len(), cli_settings.output_filename);
        let code = match class {
            ErrorClass::Client => exitcode::DATAERR,
            ErrorClass::Internal => exitcode::SOFTWARE
        };
        std::process::exit(code);
    }
}

/// This will run the "table-stat" mode of the tool
/// # Arguments
/// * `settings` - the TableStatSettings object
fn run_table_stat(settings: TableStatSettings) {
    // immediately setup logging first
    init_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: TableStatSettings = check_table_stat_settings(settings);

    // load will also validate the table
    info!("Loading rule table from {:?}...", cli_settings.input_table);
    let rule_table: RuleTable = match RuleTable::load(&cli_settings.input_table, Default::default()) {
        Ok(rt) => rt,
        Err(e) => {
            error!("Error while loading rule table file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Rule table loaded successfully.");

    // display the table statistics
    pharmaguard::table_stat::print_stats(&rule_table);
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Analyze(settings) => {
            run_analyze(*settings);
        },
        Commands::Build(settings) => {
            run_build(*settings);
        },
        Commands::TableStat(settings) => {
            run_table_stat(*settings);
        }
    }

    info!("Process finished successfully.");
}
