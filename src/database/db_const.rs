
use itertools::Itertools;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Sentinel used whenever a table lookup misses; this is a valid output, not an error
pub const UNKNOWN: &str = "Unknown";

/// Version label for the rule table compiled into the binary
pub const BUILTIN_TABLE_VERSION: &str = "builtin-cpic-v1";

/// The fixed registry of genes we can diplotype; matching against it is case-sensitive
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
    strum_macros::AsRefStr, strum_macros::Display, strum_macros::EnumIter, strum_macros::EnumString)]
pub enum PgxGene {
    #[strum(serialize = "CYP2C19")]
    #[serde(rename = "CYP2C19")]
    Cyp2c19,
    #[strum(serialize = "CYP2D6")]
    #[serde(rename = "CYP2D6")]
    Cyp2d6,
    #[strum(serialize = "DPYD")]
    #[serde(rename = "DPYD")]
    Dpyd,
    #[strum(serialize = "SLCO1B1")]
    #[serde(rename = "SLCO1B1")]
    Slco1b1,
    #[strum(serialize = "TPMT")]
    #[serde(rename = "TPMT")]
    Tpmt,
    #[strum(serialize = "UGT1A1")]
    #[serde(rename = "UGT1A1")]
    Ugt1a1
}

impl PgxGene {
    /// Exact, case-sensitive lookup in the registry
    pub fn from_symbol(symbol: &str) -> Option<PgxGene> {
        symbol.parse().ok()
    }

    /// Comma-separated list of every registry symbol, for messages
    pub fn registry_list() -> String {
        PgxGene::iter().map(|g| g.to_string()).join(", ")
    }
}

// drug names to prevent dev typos
pub const AZATHIOPRINE: &str = "AZATHIOPRINE";
pub const CLOPIDOGREL: &str = "CLOPIDOGREL";
pub const CODEINE: &str = "CODEINE";
pub const FLUOROURACIL: &str = "FLUOROURACIL";
pub const IRINOTECAN: &str = "IRINOTECAN";
pub const SIMVASTATIN: &str = "SIMVASTATIN";
pub const WARFARIN: &str = "WARFARIN";

// phenotype labels
pub const NORMAL_METABOLIZER: &str = "Normal Metabolizer";
pub const INTERMEDIATE_METABOLIZER: &str = "Intermediate Metabolizer";
pub const POOR_METABOLIZER: &str = "Poor Metabolizer";
pub const RAPID_METABOLIZER: &str = "Rapid Metabolizer";
pub const ULTRARAPID_METABOLIZER: &str = "Ultrarapid Metabolizer";
pub const NORMAL_FUNCTION: &str = "Normal Function";
pub const DECREASED_FUNCTION: &str = "Decreased Function";
pub const POOR_FUNCTION: &str = "Poor Function";

// risk labels
pub const RISK_SAFE: &str = "Safe";
pub const RISK_ADJUST: &str = "Adjust Dosage";
pub const RISK_TOXIC: &str = "Toxic";
pub const RISK_INEFFECTIVE: &str = "Ineffective";

// severity tiers
pub const SEVERITY_NONE: &str = "none";
pub const SEVERITY_LOW: &str = "low";
pub const SEVERITY_MODERATE: &str = "moderate";
pub const SEVERITY_HIGH: &str = "high";
pub const SEVERITY_CRITICAL: &str = "critical";

/// Drug names are matched after trimming and upper-casing
pub fn normalize_drug_name(drug: &str) -> String {
    drug.trim().to_uppercase()
}

/// Returns the gene symbol that governs metabolism of a drug
/// # Arguments
/// * `normalized_drug` - the drug name, already passed through `normalize_drug_name`
pub fn required_gene(normalized_drug: &str) -> Option<&'static str> {
    DRUG_GENES.get(normalized_drug).copied()
}

lazy_static!{
    /// Drug -> required gene; this is configuration, not user input.
    /// WARFARIN is intentionally mapped to CYP2C9, which is outside the registry.
    pub static ref DRUG_GENES: BTreeMap<&'static str, &'static str> = {
        [
            (AZATHIOPRINE, "TPMT"),
            (CLOPIDOGREL, "CYP2C19"),
            (CODEINE, "CYP2D6"),
            (FLUOROURACIL, "DPYD"),
            (IRINOTECAN, "UGT1A1"),
            (SIMVASTATIN, "SLCO1B1"),
            (WARFARIN, "CYP2C9")
        ].into_iter().collect()
    };

    /// Built-in (gene, canonical diplotype, phenotype) rows
    pub static ref BUILTIN_GENE_DIPLOTYPES: Vec<(PgxGene, &'static str, &'static str)> = vec![
        (PgxGene::Cyp2c19, "*1/*1", NORMAL_METABOLIZER),
        (PgxGene::Cyp2c19, "*1/*17", RAPID_METABOLIZER),
        (PgxGene::Cyp2c19, "*17/*17", ULTRARAPID_METABOLIZER),
        (PgxGene::Cyp2c19, "*1/*2", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2c19, "*1/*3", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2c19, "*17/*2", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2c19, "*17/*3", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2c19, "*2/*2", POOR_METABOLIZER),
        (PgxGene::Cyp2c19, "*2/*3", POOR_METABOLIZER),
        (PgxGene::Cyp2c19, "*3/*3", POOR_METABOLIZER),
        (PgxGene::Cyp2d6, "*1/*1", NORMAL_METABOLIZER),
        (PgxGene::Cyp2d6, "*1/*2", NORMAL_METABOLIZER),
        (PgxGene::Cyp2d6, "*2/*2", NORMAL_METABOLIZER),
        (PgxGene::Cyp2d6, "*1/*10", NORMAL_METABOLIZER),
        (PgxGene::Cyp2d6, "*1/*41", NORMAL_METABOLIZER),
        (PgxGene::Cyp2d6, "*1/*4", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2d6, "*1/*5", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2d6, "*10/*10", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2d6, "*10/*4", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2d6, "*41/*41", INTERMEDIATE_METABOLIZER),
        (PgxGene::Cyp2d6, "*4/*4", POOR_METABOLIZER),
        (PgxGene::Cyp2d6, "*4/*5", POOR_METABOLIZER),
        (PgxGene::Cyp2d6, "*5/*5", POOR_METABOLIZER),
        (PgxGene::Cyp2d6, "*1/*1xN", ULTRARAPID_METABOLIZER),
        (PgxGene::Cyp2d6, "*1xN/*2", ULTRARAPID_METABOLIZER),
        (PgxGene::Dpyd, "*1/*1", NORMAL_METABOLIZER),
        (PgxGene::Dpyd, "*1/*13", INTERMEDIATE_METABOLIZER),
        (PgxGene::Dpyd, "*1/*2A", INTERMEDIATE_METABOLIZER),
        (PgxGene::Dpyd, "*13/*13", POOR_METABOLIZER),
        (PgxGene::Dpyd, "*13/*2A", POOR_METABOLIZER),
        (PgxGene::Dpyd, "*2A/*2A", POOR_METABOLIZER),
        (PgxGene::Slco1b1, "*1/*1", NORMAL_FUNCTION),
        (PgxGene::Slco1b1, "*1/*15", DECREASED_FUNCTION),
        (PgxGene::Slco1b1, "*1/*5", DECREASED_FUNCTION),
        (PgxGene::Slco1b1, "*15/*15", POOR_FUNCTION),
        (PgxGene::Slco1b1, "*15/*5", POOR_FUNCTION),
        (PgxGene::Slco1b1, "*5/*5", POOR_FUNCTION),
        (PgxGene::Tpmt, "*1/*1", NORMAL_METABOLIZER),
        (PgxGene::Tpmt, "*1/*2", INTERMEDIATE_METABOLIZER),
        (PgxGene::Tpmt, "*1/*3A", INTERMEDIATE_METABOLIZER),
        (PgxGene::Tpmt, "*1/*3B", INTERMEDIATE_METABOLIZER),
        (PgxGene::Tpmt, "*1/*3C", INTERMEDIATE_METABOLIZER),
        (PgxGene::Tpmt, "*2/*3A", POOR_METABOLIZER),
        (PgxGene::Tpmt, "*3A/*3A", POOR_METABOLIZER),
        (PgxGene::Tpmt, "*3A/*3C", POOR_METABOLIZER),
        (PgxGene::Tpmt, "*3C/*3C", POOR_METABOLIZER),
        (PgxGene::Ugt1a1, "*1/*1", NORMAL_METABOLIZER),
        (PgxGene::Ugt1a1, "*1/*28", INTERMEDIATE_METABOLIZER),
        (PgxGene::Ugt1a1, "*1/*6", INTERMEDIATE_METABOLIZER),
        (PgxGene::Ugt1a1, "*28/*28", POOR_METABOLIZER),
        (PgxGene::Ugt1a1, "*28/*6", POOR_METABOLIZER),
        (PgxGene::Ugt1a1, "*6/*6", POOR_METABOLIZER)
    ];

    /// Built-in (drug, phenotype, risk, severity, recommendation) rows
    pub static ref BUILTIN_DRUG_PHENOTYPES: Vec<(&'static str, &'static str, &'static str, &'static str, &'static str)> = vec![
        (AZATHIOPRINE, NORMAL_METABOLIZER, RISK_SAFE, SEVERITY_NONE, "Start with the normal starting dose."),
        (AZATHIOPRINE, INTERMEDIATE_METABOLIZER, RISK_ADJUST, SEVERITY_MODERATE, "Start at 30-80% of the normal dose and adjust based on myelosuppression."),
        (AZATHIOPRINE, POOR_METABOLIZER, RISK_TOXIC, SEVERITY_CRITICAL, "Consider an alternative agent; if used, drastically reduce the dose and frequency."),
        (CLOPIDOGREL, NORMAL_METABOLIZER, RISK_SAFE, SEVERITY_NONE, "Use the standard dose."),
        (CLOPIDOGREL, RAPID_METABOLIZER, RISK_SAFE, SEVERITY_NONE, "Use the standard dose."),
        (CLOPIDOGREL, ULTRARAPID_METABOLIZER, RISK_SAFE, SEVERITY_NONE, "Use the standard dose."),
        (CLOPIDOGREL, INTERMEDIATE_METABOLIZER, RISK_INEFFECTIVE, SEVERITY_MODERATE, "Consider an alternative antiplatelet therapy (e.g. prasugrel or ticagrelor)."),
        (CLOPIDOGREL, POOR_METABOLIZER, RISK_INEFFECTIVE, SEVERITY_HIGH, "Avoid clopidogrel; use an alternative antiplatelet therapy (e.g. prasugrel or ticagrelor)."),
        (CODEINE, NORMAL_METABOLIZER, RISK_SAFE, SEVERITY_NONE, "Use the label-recommended dose."),
        (CODEINE, INTERMEDIATE_METABOLIZER, RISK_ADJUST, SEVERITY_MODERATE, "Use the label-recommended dose; if no response, consider a non-tramadol opioid."),
        (CODEINE, POOR_METABOLIZER, RISK_INEFFECTIVE, SEVERITY_HIGH, "Avoid codeine due to lack of efficacy; use a non-tramadol alternative."),
        (CODEINE, ULTRARAPID_METABOLIZER, RISK_TOXIC, SEVERITY_CRITICAL, "Avoid codeine due to potential for serious toxicity."),
        (FLUOROURACIL, NORMAL_METABOLIZER, RISK_SAFE, SEVERITY_NONE, "Use the label-recommended dose."),
        (FLUOROURACIL, INTERMEDIATE_METABOLIZER, RISK_ADJUST, SEVERITY_HIGH, "Reduce the starting dose by 50% and titrate based on toxicity."),
        (FLUOROURACIL, POOR_METABOLIZER, RISK_TOXIC, SEVERITY_CRITICAL, "Avoid fluoropyrimidine-based regimens."),
        (IRINOTECAN, NORMAL_METABOLIZER, RISK_SAFE, SEVERITY_NONE, "Use the label-recommended dose."),
        (IRINOTECAN, INTERMEDIATE_METABOLIZER, RISK_SAFE, SEVERITY_LOW, "Use the label-recommended dose and monitor for neutropenia."),
        (IRINOTECAN, POOR_METABOLIZER, RISK_ADJUST, SEVERITY_HIGH, "Reduce the starting dose and monitor for neutropenia."),
        (SIMVASTATIN, NORMAL_FUNCTION, RISK_SAFE, SEVERITY_NONE, "Prescribe the desired starting dose."),
        (SIMVASTATIN, DECREASED_FUNCTION, RISK_ADJUST, SEVERITY_MODERATE, "Prescribe a lower dose or consider an alternative statin."),
        (SIMVASTATIN, POOR_FUNCTION, RISK_TOXIC, SEVERITY_HIGH, "Prescribe an alternative statin due to myopathy risk.")
    ];
}
