
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleError, bail};
use std::collections::BTreeMap;
use std::path::Path;

use crate::database::db_const::{BUILTIN_DRUG_PHENOTYPES, BUILTIN_GENE_DIPLOTYPES, BUILTIN_TABLE_VERSION, PgxGene, normalize_drug_name, required_gene};
use crate::util::file_io::load_json;

lazy_static! {
    /// Canonical diplotype key: two "*"-prefixed alleles joined by a single "/"
    static ref DIPLOTYPE_KEY_REGEX: Regex = Regex::new(r"^(?<hap1>\*[^/\s]+)/(?<hap2>\*[^/\s]+)$").unwrap();
}

/// What to do when the rule table file is not there at startup
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::Display)]
pub enum TableLoadPolicy {
    /// Missing table is an error
    #[default]
    FailFast,
    /// Missing table becomes an empty table, so every lookup resolves to "Unknown"
    DegradeToEmpty
}

/// Risk classification for a single (drug, phenotype) pair
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DrugRule {
    /// e.g. "Safe", "Adjust Dosage", "Toxic", "Ineffective"
    pub risk: String,
    /// e.g. "none", "low", "moderate", "high", "critical"
    pub severity: String,
    /// Optional free-text clinical guidance
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>
}

/// Contains metadata about the construction of the table
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TableMetadata {
    /// The version of pharmaguard that wrote the table
    pub pharmaguard_version: String,
    /// Label for the rule content
    pub table_version: String,
    /// The time the table was constructed
    pub build_time: chrono::DateTime<chrono::Utc>
}

/// The static two-level rule table: gene -> diplotype -> phenotype and drug -> phenotype -> rule.
/// It is read-only after loading and can be shared freely between analyses.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RuleTable {
    /// Metadata for the table
    #[serde(default)]
    table_metadata: TableMetadata,
    /// gene symbol -> canonical diplotype -> phenotype
    #[serde(default)]
    gene_diplotype: BTreeMap<String, BTreeMap<String, String>>,
    /// normalized drug name -> phenotype -> rule
    #[serde(default)]
    drug_phenotype: BTreeMap<String, BTreeMap<String, DrugRule>>
}

impl RuleTable {
    /// Creates a new table from the two mappings, stamping it with the current version and time
    /// # Arguments
    /// * `table_version` - label for the rule content
    /// * `gene_diplotype` - gene -> diplotype -> phenotype
    /// * `drug_phenotype` - drug -> phenotype -> rule
    pub fn new(
        table_version: &str,
        gene_diplotype: BTreeMap<String, BTreeMap<String, String>>,
        drug_phenotype: BTreeMap<String, BTreeMap<String, DrugRule>>
    ) -> RuleTable {
        let table_metadata = TableMetadata {
            pharmaguard_version: crate::cli::core::FULL_VERSION.to_string(),
            table_version: table_version.to_string(),
            build_time: chrono::Utc::now()
        };
        RuleTable {
            table_metadata,
            gene_diplotype,
            drug_phenotype
        }
    }

    /// The table compiled into the binary
    pub fn builtin() -> RuleTable {
        let mut gene_diplotype: BTreeMap<String, BTreeMap<String, String>> = Default::default();
        for (gene, diplotype, phenotype) in BUILTIN_GENE_DIPLOTYPES.iter() {
            gene_diplotype.entry(gene.to_string()).or_default()
                .insert(diplotype.to_string(), phenotype.to_string());
        }

        let mut drug_phenotype: BTreeMap<String, BTreeMap<String, DrugRule>> = Default::default();
        for (drug, phenotype, risk, severity, recommendation) in BUILTIN_DRUG_PHENOTYPES.iter() {
            drug_phenotype.entry(drug.to_string()).or_default()
                .insert(phenotype.to_string(), DrugRule {
                    risk: risk.to_string(),
                    severity: severity.to_string(),
                    recommendation: Some(recommendation.to_string())
                });
        }

        RuleTable::new(BUILTIN_TABLE_VERSION, gene_diplotype, drug_phenotype)
    }

    /// Loads a table from a JSON file (optionally gzipped) and validates it.
    /// # Arguments
    /// * `filename` - the path to load
    /// * `policy` - controls what happens if the file does not exist
    /// # Errors
    /// * if the file is missing and the policy is `FailFast`
    /// * if the file cannot be read or parsed
    /// * if the table fails validation
    pub fn load(filename: &Path, policy: TableLoadPolicy) -> Result<RuleTable, Box<dyn std::error::Error>> {
        if !filename.exists() {
            match policy {
                TableLoadPolicy::FailFast => bail!("Rule table does not exist: {:?}", filename),
                TableLoadPolicy::DegradeToEmpty => {
                    warn!("Rule table does not exist: {filename:?}; continuing with an empty table, all lookups will be Unknown");
                    return Ok(RuleTable::default());
                }
            }
        }

        let table: RuleTable = load_json(filename)?;
        table.validate()?;
        debug!("Loaded rule table {:?} with {} genes and {} drugs", table.table_metadata.table_version, table.gene_diplotype.len(), table.drug_phenotype.len());
        Ok(table)
    }

    /// Validates the loaded table where possible.
    /// Keys that could never be hit by a lookup are rejected so that typos do not silently become "Unknown".
    /// # Errors
    /// * if a gene is outside the registry
    /// * if a diplotype key is not two "*" alleles in sorted order
    /// * if a drug key is not in normalized (upper-case) form
    pub fn validate(&self) -> Result<(), SimpleError> {
        for (gene, diplotypes) in self.gene_diplotype.iter() {
            if PgxGene::from_symbol(gene).is_none() {
                bail!("Rule table gene {:?} is not in the supported gene registry ({})", gene, PgxGene::registry_list());
            }

            for diplotype in diplotypes.keys() {
                let captures = match DIPLOTYPE_KEY_REGEX.captures(diplotype) {
                    Some(c) => c,
                    None => bail!("Rule table diplotype {:?} for {} is not of the form *A/*B", diplotype, gene)
                };
                if captures["hap1"] > captures["hap2"] {
                    bail!("Rule table diplotype {:?} for {} is not in sorted order", diplotype, gene);
                }
            }
        }

        for drug in self.drug_phenotype.keys() {
            if *drug != normalize_drug_name(drug) {
                bail!("Rule table drug {:?} must be upper-case without surrounding whitespace", drug);
            }
            if required_gene(drug).is_none() {
                warn!("Rule table drug {drug:?} has no required-gene mapping and will never be evaluated");
            }
        }
        Ok(())
    }

    /// Exact lookup of a phenotype; no fuzzy matching on allele order
    pub fn phenotype(&self, gene: &str, diplotype: &str) -> Option<&str> {
        self.gene_diplotype.get(gene)?
            .get(diplotype)
            .map(|p| p.as_str())
    }

    /// Exact lookup of a drug rule
    /// # Arguments
    /// * `normalized_drug` - drug name after `normalize_drug_name`
    /// * `phenotype` - the phenotype label
    pub fn drug_rule(&self, normalized_drug: &str, phenotype: &str) -> Option<&DrugRule> {
        self.drug_phenotype.get(normalized_drug)?
            .get(phenotype)
    }

    pub fn is_empty(&self) -> bool {
        self.gene_diplotype.is_empty() && self.drug_phenotype.is_empty()
    }

    pub fn table_metadata(&self) -> &TableMetadata {
        &self.table_metadata
    }

    pub fn gene_diplotype(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.gene_diplotype
    }

    pub fn drug_phenotype(&self) -> &BTreeMap<String, BTreeMap<String, DrugRule>> {
        &self.drug_phenotype
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    fn single_entry_table(gene: &str, diplotype: &str, drug: &str) -> RuleTable {
        let gene_diplotype = BTreeMap::from([
            (gene.to_string(), BTreeMap::from([(diplotype.to_string(), "Poor Metabolizer".to_string())]))
        ]);
        let drug_phenotype = BTreeMap::from([
            (drug.to_string(), BTreeMap::from([(
                "Poor Metabolizer".to_string(),
                DrugRule { risk: "Ineffective".to_string(), severity: "high".to_string(), recommendation: None }
            )]))
        ]);
        RuleTable::new("test", gene_diplotype, drug_phenotype)
    }

    #[test]
    fn test_builtin() {
        let table = RuleTable::builtin();
        table.validate().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.table_metadata().table_version, BUILTIN_TABLE_VERSION);
        assert_eq!(table.gene_diplotype().len(), 6);
        assert_eq!(table.phenotype("CYP2C19", "*2/*2"), Some("Poor Metabolizer"));
        assert_eq!(table.phenotype("CYP2C19", "*1/*17"), Some("Rapid Metabolizer"));

        let rule = table.drug_rule("CLOPIDOGREL", "Poor Metabolizer").unwrap();
        assert_eq!(rule.risk, "Ineffective");
        assert_eq!(rule.severity, "high");
        assert!(rule.recommendation.is_some());
    }

    #[test]
    fn test_lookup_exact_only() {
        let table = RuleTable::builtin();
        // allele order matters, the resolver guarantees the sorted form
        assert_eq!(table.phenotype("CYP2C19", "*17/*2"), Some("Intermediate Metabolizer"));
        assert_eq!(table.phenotype("CYP2C19", "*2/*17"), None);
        assert_eq!(table.phenotype("CYP2C9", "*1/*1"), None);
        assert_eq!(table.drug_rule("clopidogrel", "Poor Metabolizer"), None);
        assert_eq!(table.drug_rule("CLOPIDOGREL", "Unknown"), None);
    }

    #[test]
    fn test_empty() {
        let table = RuleTable::default();
        assert!(table.is_empty());
        table.validate().unwrap();
        assert_eq!(table.phenotype("CYP2C19", "*1/*1"), None);
    }

    #[test]
    fn test_validate_bad_gene() {
        let table = single_entry_table("CYP2C9", "*1/*1", "CLOPIDOGREL");
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validate_unsorted_diplotype() {
        let table = single_entry_table("CYP2C19", "*2/*17", "CLOPIDOGREL");
        assert!(table.validate().is_err());

        let table = single_entry_table("CYP2C19", "2/17", "CLOPIDOGREL");
        assert!(table.validate().is_err());

        let table = single_entry_table("CYP2C19", "*17/*2", "CLOPIDOGREL");
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_drug_case() {
        let table = single_entry_table("CYP2C19", "*2/*2", "Clopidogrel");
        assert!(table.validate().is_err());

        // unmapped drugs are only a warning
        let table = single_entry_table("CYP2C19", "*2/*2", "ASPIRIN");
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_load_fixture() {
        let table_fn = PathBuf::from("test_data/rule_table.json");
        let table = RuleTable::load(&table_fn, TableLoadPolicy::FailFast).unwrap();
        assert_eq!(table.table_metadata().table_version, "fixture-v1");
        assert_eq!(table.phenotype("CYP2C19", "*2/*2"), Some("Poor Metabolizer"));
        assert_eq!(table.drug_rule("CLOPIDOGREL", "Poor Metabolizer").unwrap().recommendation, None);
    }

    #[test]
    fn test_load_missing() {
        let table_fn = PathBuf::from("test_data/does_not_exist.json");
        assert!(RuleTable::load(&table_fn, TableLoadPolicy::FailFast).is_err());

        let table = RuleTable::load(&table_fn, TableLoadPolicy::DegradeToEmpty).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_invalid() {
        // parse and validation errors are not covered by the degrade policy
        let table_fn = PathBuf::from("test_data/invalid_rule_table.json");
        assert!(RuleTable::load(&table_fn, TableLoadPolicy::DegradeToEmpty).is_err());
    }
}
