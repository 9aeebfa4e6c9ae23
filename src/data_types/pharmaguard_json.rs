use serde::Serialize;
use simple_error::bail;
use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry::{Occupied, Vacant};
use std::fs::File;
use std::path::Path;

use crate::data_types::pgx_diplotype::Diplotype;
use crate::data_types::variant_record::ScanStats;
use crate::database::db_const::UNKNOWN;
use crate::database::rule_table::TableMetadata;
use crate::errors::{AnalysisError, ErrorClass};

/// Intended to be serialized to JSON as the final result
#[derive(Debug, Serialize)]
pub struct PharmaguardJson {
    /// Version of the tool that generated the calls
    pharmaguard_version: String,
    /// Metadata for the rule table
    table_metadata: TableMetadata,
    /// Patient identifier supplied by the user
    patient_id: String,
    /// When the analysis was run
    timestamp: chrono::DateTime<chrono::Utc>,
    /// Map from normalized drug name to its result
    drug_results: BTreeMap<String, PgxDrugResult>,
    /// Map from normalized drug name to the reason it could not be analyzed
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    drug_failures: BTreeMap<String, PgxDrugFailure>
}

impl PharmaguardJson {
    /// Basic constructor, the timestamp is taken now
    pub fn new(table_metadata: TableMetadata, patient_id: &str) -> Self {
        Self {
            pharmaguard_version: crate::cli::core::FULL_VERSION.to_string(),
            table_metadata,
            patient_id: patient_id.to_string(),
            timestamp: chrono::Utc::now(),
            drug_results: Default::default(),
            drug_failures: Default::default()
        }
    }

    /// Simple wrapper for our result insertion to make sure we do not double insert
    /// # Arguments
    /// * `result` - the result getting saved, keyed on its drug
    pub fn insert(&mut self, result: PgxDrugResult) -> Result<(), Box<dyn std::error::Error>> {
        if self.drug_failures.contains_key(&result.drug) {
            bail!("Entry for {} is already marked as failed.", result.drug);
        }
        match self.drug_results.entry(result.drug.clone()) {
            Vacant(entry) => entry.insert(result),
            Occupied(entry) => bail!("Entry for {} is already occupied.", entry.key())
        };
        Ok(())
    }

    /// Records a drug that could not be analyzed, the other drugs are unaffected
    /// # Arguments
    /// * `drug` - the normalized drug name
    /// * `error` - the reason the analysis failed
    pub fn insert_failure(&mut self, drug: &str, error: &AnalysisError) -> Result<(), Box<dyn std::error::Error>> {
        if self.drug_results.contains_key(drug) {
            bail!("Entry for {} already has a result.", drug);
        }
        match self.drug_failures.entry(drug.to_string()) {
            Vacant(entry) => entry.insert(PgxDrugFailure {
                drug: drug.to_string(),
                error_class: error.class(),
                message: error.to_string()
            }),
            Occupied(entry) => bail!("Entry for {} is already occupied.", entry.key())
        };
        Ok(())
    }

    /// The most severe class among the failed drugs, None if everything succeeded
    pub fn failure_class(&self) -> Option<ErrorClass> {
        if self.drug_failures.values().any(|f| f.error_class == ErrorClass::Internal) {
            Some(ErrorClass::Internal)
        } else if !self.drug_failures.is_empty() {
            Some(ErrorClass::Client)
        } else {
            None
        }
    }

    /// Writes a flat TSV with one row per successfully analyzed drug, sorted by drug
    /// # Arguments
    /// * `filename` - the output filename, TSV
    /// # Errors
    /// * if we have any errors opening or writing to the file
    pub fn save_summary_tsv(&self, filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let delimiter: u8 = b'\t';
        let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;

        for (drug, drug_result) in self.drug_results.iter() {
            let profile = drug_result.pharmacogenomic_profile();
            let risk = drug_result.risk_assessment();
            let row = SummaryRow {
                patient_id: &self.patient_id,
                drug,
                gene: profile.gene(),
                diplotype: profile.diplotype(),
                phenotype: profile.phenotype(),
                risk_label: &risk.risk_label,
                severity: &risk.severity,
                low_confidence: profile.low_confidence()
            };
            csv_writer.serialize(&row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn table_metadata(&self) -> &TableMetadata {
        &self.table_metadata
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn drug_results(&self) -> &BTreeMap<String, PgxDrugResult> {
        &self.drug_results
    }

    pub fn drug_failures(&self) -> &BTreeMap<String, PgxDrugFailure> {
        &self.drug_failures
    }
}

/// Wrapper for the flat summary output
#[derive(Serialize)]
struct SummaryRow<'a> {
    patient_id: &'a str,
    drug: &'a str,
    gene: &'a str,
    diplotype: &'a str,
    phenotype: &'a str,
    risk_label: &'a str,
    severity: &'a str,
    low_confidence: bool
}

/// A drug whose analysis stopped with an error
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PgxDrugFailure {
    /// normalized drug name
    pub drug: String,
    /// whether this was a problem with the input or with us
    pub error_class: ErrorClass,
    /// the error message
    pub message: String
}

/// Everything we report for one (file, drug) analysis
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PgxDrugResult {
    /// normalized drug name
    drug: String,
    /// the deterministic risk verdict
    risk_assessment: RiskClassification,
    /// the resolved gene profile
    pharmacogenomic_profile: PharmacogenomicProfile,
    /// counts about the VCF scan
    quality_metrics: QualityMetrics
}

impl PgxDrugResult {
    pub fn new(drug: String, risk_assessment: RiskClassification, pharmacogenomic_profile: PharmacogenomicProfile, quality_metrics: QualityMetrics) -> PgxDrugResult {
        PgxDrugResult {
            drug,
            risk_assessment,
            pharmacogenomic_profile,
            quality_metrics
        }
    }

    // getters
    pub fn drug(&self) -> &str {
        &self.drug
    }

    pub fn risk_assessment(&self) -> &RiskClassification {
        &self.risk_assessment
    }

    pub fn pharmacogenomic_profile(&self) -> &PharmacogenomicProfile {
        &self.pharmacogenomic_profile
    }

    pub fn quality_metrics(&self) -> &QualityMetrics {
        &self.quality_metrics
    }
}

/// Output of the rule evaluator; missing table entries show up as "Unknown"
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskClassification {
    pub phenotype: String,
    pub risk_label: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>
}

impl RiskClassification {
    /// Classification where nothing matched
    pub fn unknown() -> RiskClassification {
        RiskClassification {
            phenotype: UNKNOWN.to_string(),
            risk_label: UNKNOWN.to_string(),
            severity: UNKNOWN.to_string(),
            recommendation: None
        }
    }
}

/// How the diplotype was arrived at
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum AlleleEvidence {
    /// At least one star allele was decoded from the file
    Observed,
    /// The gene was present but carried no star allele, so "*1/*1" was assumed
    WildTypeDefault
}

/// The canonical gene-level profile; immutable once assembled
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PharmacogenomicProfile {
    gene: String,
    diplotype: String,
    phenotype: String,
    /// deduplicated, sorted rsIDs
    detected_variants: Vec<String>,
    evidence: AlleleEvidence,
    low_confidence: bool
}

impl PharmacogenomicProfile {
    /// Packages the resolver and evaluator output, no decisions are made here.
    /// # Arguments
    /// * `gene` - the gene symbol
    /// * `diplotype` - the resolved diplotype
    /// * `phenotype` - phenotype from the rule table, or "Unknown"
    /// * `rsids` - every rsID seen for the gene, in any order and with repeats
    /// * `evidence` - whether the diplotype came from observed alleles
    pub fn assemble<I, S>(gene: &str, diplotype: &Diplotype, phenotype: &str, rsids: I, evidence: AlleleEvidence) -> PharmacogenomicProfile
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        let detected_variants: BTreeSet<String> = rsids.into_iter().map(|s| s.into()).collect();
        PharmacogenomicProfile {
            gene: gene.to_string(),
            diplotype: diplotype.diplotype().to_string(),
            phenotype: phenotype.to_string(),
            detected_variants: detected_variants.into_iter().collect(),
            evidence,
            low_confidence: evidence == AlleleEvidence::WildTypeDefault
        }
    }

    // getters
    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn diplotype(&self) -> &str {
        &self.diplotype
    }

    pub fn phenotype(&self) -> &str {
        &self.phenotype
    }

    pub fn detected_variants(&self) -> &[String] {
        &self.detected_variants
    }

    pub fn evidence(&self) -> AlleleEvidence {
        self.evidence
    }

    pub fn low_confidence(&self) -> bool {
        self.low_confidence
    }
}

/// Counts about the parsed VCF
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QualityMetrics {
    /// true if at least one data row was parsed
    pub vcf_parsing_success: bool,
    /// data rows parsed
    pub records_parsed: usize,
    /// data rows skipped for having too few columns
    pub records_skipped: usize,
    /// data rows annotated with the target gene
    pub gene_records: usize
}

impl QualityMetrics {
    pub fn new(scan_stats: ScanStats, gene_records: usize) -> QualityMetrics {
        QualityMetrics {
            vcf_parsing_success: scan_stats.records_parsed > 0,
            records_parsed: scan_stats.records_parsed,
            records_skipped: scan_stats.records_skipped,
            gene_records
        }
    }
}
