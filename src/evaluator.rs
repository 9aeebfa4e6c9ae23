
use log::debug;

use crate::data_types::pharmaguard_json::RiskClassification;
use crate::database::db_const::{UNKNOWN, normalize_drug_name};
use crate::database::rule_table::RuleTable;

/// Deterministic two-stage lookup against a rule table.
/// The table is injected at construction and never modified, so one table can back any number of evaluators.
pub struct RuleEvaluator<'a> {
    rule_table: &'a RuleTable
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(rule_table: &'a RuleTable) -> RuleEvaluator<'a> {
        RuleEvaluator {
            rule_table
        }
    }

    /// gene + diplotype -> phenotype, "Unknown" on a miss
    pub fn phenotype(&self, gene: &str, diplotype: &str) -> String {
        match self.rule_table.phenotype(gene, diplotype) {
            Some(phenotype) => phenotype.to_string(),
            None => {
                debug!("No phenotype for {gene} {diplotype}");
                UNKNOWN.to_string()
            }
        }
    }

    /// drug + phenotype -> risk classification; risk and severity are "Unknown" on a miss
    /// # Arguments
    /// * `drug` - the drug name, normalized here
    /// * `phenotype` - the phenotype label
    pub fn classify(&self, drug: &str, phenotype: &str) -> RiskClassification {
        let normalized_drug = normalize_drug_name(drug);
        match self.rule_table.drug_rule(&normalized_drug, phenotype) {
            Some(rule) => RiskClassification {
                phenotype: phenotype.to_string(),
                risk_label: rule.risk.clone(),
                severity: rule.severity.clone(),
                recommendation: rule.recommendation.clone()
            },
            None => {
                debug!("No rule for {normalized_drug} with phenotype {phenotype}");
                RiskClassification {
                    phenotype: phenotype.to_string(),
                    ..RiskClassification::unknown()
                }
            }
        }
    }

    /// Full evaluation of any (gene, diplotype, drug) triple.
    /// This never fails; the worst case is every field set to "Unknown".
    pub fn evaluate(&self, gene: &str, diplotype: &str, drug: &str) -> RiskClassification {
        let phenotype = self.phenotype(gene, diplotype);
        self.classify(drug, &phenotype)
    }
}
