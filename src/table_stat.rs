
use std::collections::BTreeMap;

use crate::database::db_const::required_gene;
use crate::database::rule_table::RuleTable;

/// Simple per-drug counts for a table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrugStats {
    /// the gene the drug is routed to, if any
    pub gene: Option<&'static str>,
    /// phenotypes with a rule
    pub phenotypes: usize,
    /// phenotypes for this drug that no diplotype of the routed gene can produce
    pub unreachable_phenotypes: usize
}

/// Computes per-drug statistics, mainly to spot rules that can never fire
/// # Arguments
/// * `rule_table` - the table to summarize
pub fn drug_stats(rule_table: &RuleTable) -> BTreeMap<String, DrugStats> {
    rule_table.drug_phenotype().iter()
        .map(|(drug, rules)| {
            let gene = required_gene(drug);
            let reachable = gene.and_then(|g| rule_table.gene_diplotype().get(g));
            let unreachable_phenotypes = rules.keys()
                .filter(|phenotype| {
                    reachable.map(|diplotypes| !diplotypes.values().any(|p| p == *phenotype)).unwrap_or(true)
                })
                .count();
            (drug.clone(), DrugStats {
                gene,
                phenotypes: rules.len(),
                unreachable_phenotypes
            })
        })
        .collect()
}

/// Prints the statistics for a given rule table
/// # Arguments
/// * `rule_table` - the table to print the statistics for
pub fn print_stats(rule_table: &RuleTable) {
    // display the table metadata
    let metadata = rule_table.table_metadata();
    println!("Rule table metadata:");
    println!("\tVersion: {}", metadata.pharmaguard_version);
    println!("\tTable version: {}", metadata.table_version);
    println!("\tBuild time: {}", metadata.build_time);

    let gene_diplotype = rule_table.gene_diplotype();
    let drug_phenotype = rule_table.drug_phenotype();
    let all_drug_stats = drug_stats(rule_table);

    println!("Rule table statistics:");
    println!("\tTotal genes: {}", gene_diplotype.len());
    println!("\tTotal diplotypes: {}", gene_diplotype.values().map(|d| d.len()).sum::<usize>());
    println!("\tTotal drugs: {}", drug_phenotype.len());
    println!("\tTotal drug rules: {}", drug_phenotype.values().map(|r| r.len()).sum::<usize>());
    println!("\tUnreachable drug rules: {}", all_drug_stats.values().map(|s| s.unreachable_phenotypes).sum::<usize>());

    // now do per-gene statistics, but these are just if we have elevated verbosity
    if log::log_enabled!(log::Level::Debug) {
        println!();
        println!("Gene statistics:");
        println!("gene\tdiplotypes\tphenotypes");
        for (gene, diplotypes) in gene_diplotype.iter() {
            let mut phenotype_counts: BTreeMap<&str, usize> = BTreeMap::new();
            for phenotype in diplotypes.values() {
                *phenotype_counts.entry(phenotype.as_str()).or_insert(0) += 1;
            }
            let phenotype_summary: Vec<String> = phenotype_counts.iter()
                .map(|(phenotype, count)| format!("{phenotype}={count}"))
                .collect();
            println!("{gene}\t{}\t{}", diplotypes.len(), phenotype_summary.join(";"));
        }
        println!();

        println!("Drug statistics:");
        println!("drug\tgene\tphenotypes\tunreachable");
        for (drug, stats) in all_drug_stats.iter() {
            println!("{drug}\t{}\t{}\t{}", stats.gene.unwrap_or("NONE"), stats.phenotypes, stats.unreachable_phenotypes);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::database::rule_table::DrugRule;

    #[test]
    fn test_builtin_drug_stats() {
        let table = RuleTable::builtin();
        let stats = drug_stats(&table);
        assert_eq!(stats.len(), 6);

        let clopidogrel = stats.get("CLOPIDOGREL").unwrap();
        assert_eq!(clopidogrel.gene, Some("CYP2C19"));
        assert_eq!(clopidogrel.phenotypes, 5);
        assert_eq!(clopidogrel.unreachable_phenotypes, 0);

        // every built-in rule can fire
        assert!(stats.values().all(|s| s.unreachable_phenotypes == 0));
    }

    #[test]
    fn test_unreachable_rules() {
        let gene_diplotype = BTreeMap::from([
            ("CYP2C19".to_string(), BTreeMap::from([("*2/*2".to_string(), "Poor Metabolizer".to_string())]))
        ]);
        let rule = DrugRule { risk: "Safe".to_string(), severity: "none".to_string(), recommendation: None };
        let drug_phenotype = BTreeMap::from([
            ("CLOPIDOGREL".to_string(), BTreeMap::from([
                ("Poor Metabolizer".to_string(), rule.clone()),
                ("Normal Metabolizer".to_string(), rule.clone())
            ])),
            ("ASPIRIN".to_string(), BTreeMap::from([("Poor Metabolizer".to_string(), rule)]))
        ]);
        let table = RuleTable::new("test", gene_diplotype, drug_phenotype);
        let stats = drug_stats(&table);

        assert_eq!(stats.get("CLOPIDOGREL").unwrap().unreachable_phenotypes, 1);
        assert_eq!(stats.get("ASPIRIN").unwrap(), &DrugStats { gene: None, phenotypes: 1, unreachable_phenotypes: 1 });
    }
}
