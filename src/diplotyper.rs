
use log::{debug, info, warn};

use crate::data_types::pgx_diplotype::{Diplotype, resolve_diplotype};
use crate::data_types::pharmaguard_json::{AlleleEvidence, PgxDrugResult, PharmacogenomicProfile, QualityMetrics};
use crate::data_types::variant_record::RecordScanner;
use crate::database::db_const::{PgxGene, normalize_drug_name, required_gene};
use crate::database::rule_table::RuleTable;
use crate::errors::AnalysisError;
use crate::evaluator::RuleEvaluator;
use crate::extractor::{GeneObservations, extract_gene};

/// Finds the registry gene that governs a drug.
/// This happens before any file scanning.
/// # Arguments
/// * `drug` - the drug name as given by the user
/// # Errors
/// * if the drug has no gene mapping
/// * if the mapped gene is outside the registry
pub fn route_drug(drug: &str) -> Result<(String, PgxGene), AnalysisError> {
    let normalized_drug = normalize_drug_name(drug);
    let gene_symbol = required_gene(&normalized_drug)
        .ok_or_else(|| AnalysisError::UnmappedDrug { drug: normalized_drug.clone() })?;
    let gene = PgxGene::from_symbol(gene_symbol)
        .ok_or_else(|| AnalysisError::UnsupportedGene { gene: gene_symbol.to_string() })?;
    Ok((normalized_drug, gene))
}

/// Converts the observations for a gene into a diplotype.
/// A gene that is present but has no star allele evidence falls back to "*1/*1" and is flagged as such.
/// # Arguments
/// * `observations` - everything extracted for the gene
/// # Errors
/// * if no record was annotated with the gene; this is `UnsupportedGene` if every annotated gene in the file is outside the registry
pub fn call_diplotype(observations: &GeneObservations) -> Result<(Diplotype, AlleleEvidence), AnalysisError> {
    if observations.matched_records() == 0 {
        let other_genes = observations.other_genes();
        let all_unsupported = other_genes.iter().all(|g| PgxGene::from_symbol(g).is_none());
        if let (Some(first_gene), true) = (other_genes.first(), all_unsupported) {
            return Err(AnalysisError::UnsupportedGene { gene: first_gene.clone() });
        }
        return Err(AnalysisError::NoMatchingVariants { gene: observations.gene().to_string() });
    }

    if observations.star_alleles().is_empty() {
        warn!("{} is present but has no star allele evidence, defaulting to the wild-type diplotype", observations.gene());
        return Ok((Diplotype::wild_type(), AlleleEvidence::WildTypeDefault));
    }

    let diplotype = resolve_diplotype(observations.star_alleles())?;
    Ok((diplotype, AlleleEvidence::Observed))
}

/// This is the main function for a single (file, drug) analysis.
/// Each call is independent; the rule table is only read.
/// # Arguments
/// * `rule_table` - the pre-loaded rule table
/// * `vcf_text` - the full VCF content
/// * `drug` - the drug to classify, in any casing
/// # Errors
/// * if the drug cannot be routed to a supported gene
/// * if the file has no records for that gene
pub fn analyze_drug(rule_table: &RuleTable, vcf_text: &str, drug: &str) -> Result<PgxDrugResult, AnalysisError> {
    let (normalized_drug, gene) = route_drug(drug)?;
    info!("Solving {normalized_drug} via {gene}...");

    let mut scanner = RecordScanner::new(vcf_text);
    let observations = extract_gene(scanner.by_ref(), gene.as_ref());
    let scan_stats = scanner.stats();
    debug!("Scanned {} records ({} skipped), {} for {gene}", scan_stats.records_parsed, scan_stats.records_skipped, observations.matched_records());
    debug!("Observed alleles: {:?}", observations.star_alleles());

    let (diplotype, evidence) = call_diplotype(&observations)?;
    debug!("Diplotype for {gene} => {} ({evidence:?})", diplotype.diplotype());

    let evaluator = RuleEvaluator::new(rule_table);
    let risk_assessment = evaluator.evaluate(gene.as_ref(), diplotype.diplotype(), &normalized_drug);
    debug!("Risk for {normalized_drug} => {} / {}", risk_assessment.risk_label, risk_assessment.severity);

    let profile = PharmacogenomicProfile::assemble(
        gene.as_ref(),
        &diplotype,
        &risk_assessment.phenotype,
        observations.rsids().iter().cloned(),
        evidence
    );
    let quality_metrics = QualityMetrics::new(scan_stats, observations.matched_records());

    Ok(PgxDrugResult::new(normalized_drug, risk_assessment, profile, quality_metrics))
}
