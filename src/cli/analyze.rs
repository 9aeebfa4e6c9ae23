
use clap::Args;
use itertools::Itertools;
use log::{info, warn};
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_optional_filename, check_required_filename};
use crate::database::db_const::normalize_drug_name;
use crate::database::rule_table::TableLoadPolicy;

#[derive(Args, Clone, Default)]
#[clap(author, about, 
    after_help = &**AFTER_HELP)]
pub struct AnalyzeSettings {
    /// Input variant file in VCF format, optionally gzipped
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub vcf_filename: PathBuf,

    /// Input rule table file (JSON); the built-in table is used if not provided
    #[clap(short = 't')]
    #[clap(long = "table")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub rule_table: Option<PathBuf>,

    /// Output analysis file (JSON)
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Optional flat summary with one row per drug
    #[clap(long = "output-tsv")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_tsv: Option<PathBuf>,

    /// Target drug, can be specified multiple times
    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "drug")]
    #[clap(value_name = "DRUG")]
    #[clap(help_heading = Some("Analysis"))]
    pub drugs: Vec<String>,

    /// Patient identifier copied into the output
    #[clap(long = "patient-id")]
    #[clap(value_name = "ID")]
    #[clap(default_value = "PATIENT_UNKNOWN")]
    #[clap(help_heading = Some("Analysis"))]
    pub patient_id: String,

    /// If the rule table file is missing, continue with an empty table (all lookups become "Unknown")
    #[clap(long = "allow-empty-table")]
    #[clap(help_heading = Some("Analysis"))]
    pub allow_empty_table: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl AnalyzeSettings {
    /// The policy to apply when loading the rule table
    pub fn table_load_policy(&self) -> TableLoadPolicy {
        if self.allow_empty_table {
            TableLoadPolicy::DegradeToEmpty
        } else {
            TableLoadPolicy::FailFast
        }
    }
}

pub fn check_analyze_settings(mut settings: AnalyzeSettings) -> Result<AnalyzeSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.vcf_filename, "VCF file");
    if !settings.allow_empty_table {
        check_optional_filename(settings.rule_table.as_deref(), "Rule table JSON");
    }

    // dump stuff to the logger
    info!("\tVCF: {:?}", settings.vcf_filename);
    match settings.rule_table.as_ref() {
        Some(table_fn) => {
            info!("\tRule table: {:?}", table_fn);
            if settings.allow_empty_table {
                warn!("\tMissing rule table will degrade to an empty table");
            }
        },
        None => {
            info!("\tRule table: built-in");
            if settings.allow_empty_table {
                warn!("\t--allow-empty-table has no effect with the built-in rule table");
            }
        }
    };

    // drop empty entries and any repeats after normalizing
    settings.drugs = settings.drugs.iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unique_by(|d| normalize_drug_name(d))
        .collect();
    if settings.drugs.is_empty() {
        bail!("Must provide at least one non-empty --drug value.");
    }
    info!("\tDrugs: {}", settings.drugs.join(", "));

    if settings.patient_id.trim().is_empty() {
        bail!("--patient-id cannot be empty");
    }
    info!("\tPatient ID: {}", settings.patient_id);

    // outputs
    info!("Outputs:");
    info!("\tAnalysis: {:?}", settings.output_filename);
    if let Some(filename) = settings.output_tsv.as_ref() {
        info!("\tSummary TSV: {:?}", filename);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_settings(drugs: &[&str]) -> AnalyzeSettings {
        AnalyzeSettings {
            vcf_filename: PathBuf::from("test_data/scenario_a.vcf"),
            output_filename: PathBuf::from("unused.json"),
            drugs: drugs.iter().map(|d| d.to_string()).collect(),
            patient_id: "PATIENT_001".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_drug_dedup() {
        let settings = check_analyze_settings(create_settings(&["clopidogrel", " CLOPIDOGREL ", "codeine", ""])).unwrap();
        assert_eq!(settings.drugs, vec!["clopidogrel".to_string(), "codeine".to_string()]);
    }

    #[test]
    fn test_no_drugs() {
        assert!(check_analyze_settings(create_settings(&["", "  "])).is_err());
    }

    #[test]
    fn test_empty_patient() {
        let mut settings = create_settings(&["codeine"]);
        settings.patient_id = " ".to_string();
        assert!(check_analyze_settings(settings).is_err());
    }

    #[test]
    fn test_table_load_policy() {
        let mut settings = create_settings(&["codeine"]);
        assert_eq!(settings.table_load_policy(), TableLoadPolicy::FailFast);
        settings.allow_empty_table = true;
        assert_eq!(settings.table_load_policy(), TableLoadPolicy::DegradeToEmpty);
    }
}
