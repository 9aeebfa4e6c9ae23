
use log::{trace, warn};
use std::collections::BTreeSet;

use crate::data_types::star_allele::{StarAllele, decode_genotype};
use crate::data_types::variant_record::VariantRecord;

/// INFO key holding the gene symbol
pub const GENE_KEY: &str = "GENE";
/// INFO key holding the star allele label
pub const STAR_KEY: &str = "STAR";

/// Everything collected for one target gene across the records of a VCF.
/// The caller owns this and the extractor only ever appends to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneObservations {
    /// the gene we were filtering for
    gene: String,
    /// records whose GENE annotation matched
    matched_records: usize,
    /// every decoded allele, in file order
    star_alleles: Vec<StarAllele>,
    /// rsIDs on matching records, deduplicated and sorted
    rsids: BTreeSet<String>,
    /// annotated genes on records that did not match
    other_genes: BTreeSet<String>
}

impl GeneObservations {
    pub fn new(gene: &str) -> GeneObservations {
        GeneObservations {
            gene: gene.to_string(),
            ..Default::default()
        }
    }

    // getters
    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn matched_records(&self) -> usize {
        self.matched_records
    }

    pub fn star_alleles(&self) -> &[StarAllele] {
        &self.star_alleles
    }

    pub fn rsids(&self) -> &BTreeSet<String> {
        &self.rsids
    }

    pub fn other_genes(&self) -> &BTreeSet<String> {
        &self.other_genes
    }
}

/// Checks one record against the target gene and, if it belongs, collects its rsID and decoded star alleles.
/// A malformed genotype call only drops that record's alleles; its rsID is still kept.
/// # Arguments
/// * `record` - the parsed VCF row
/// * `observations` - accumulator for the target gene
/// # Returns
/// * true if the record belonged to the target gene
pub fn extract_record(record: &VariantRecord, observations: &mut GeneObservations) -> bool {
    let annotations = record.annotations();
    match annotations.get(GENE_KEY) {
        Some(&gene) if gene == observations.gene => {},
        Some(&gene) => {
            if !gene.is_empty() {
                observations.other_genes.insert(gene.to_string());
            }
            return false;
        },
        None => return false
    };
    observations.matched_records += 1;

    if let Some(rsid) = record.rsid() {
        observations.rsids.insert(rsid.to_string());
    }

    let opt_star = annotations.get(STAR_KEY).and_then(|s| StarAllele::parse(s));
    if let Some(star_allele) = opt_star {
        match decode_genotype(record.genotype_call(), &star_allele) {
            Ok(alleles) => {
                trace!("{}:{} {} -> {:?}", record.chrom(), record.position(), star_allele, alleles);
                observations.star_alleles.extend(alleles);
            },
            Err(e) => {
                warn!("Ignoring alleles at {}:{} ({}): {e}", record.chrom(), record.position(), record.variant_id());
            }
        }
    }
    true
}

/// Runs every record through `extract_record` for a single gene
/// # Arguments
/// * `records` - the parsed rows, typically a `RecordScanner`
/// * `gene` - the target gene symbol
pub fn extract_gene<'a, I>(records: I, gene: &str) -> GeneObservations
where
    I: IntoIterator<Item = VariantRecord<'a>>
{
    let mut observations = GeneObservations::new(gene);
    for record in records {
        extract_record(&record, &mut observations);
    }
    observations
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data_types::variant_record::RecordScanner;

    fn labels(observations: &GeneObservations) -> Vec<&str> {
        observations.star_alleles().iter().map(|a| a.as_str()).collect()
    }

    #[test]
    fn test_extract_record_match() {
        let record = VariantRecord::from_line("chr10\t94781859\trs4244285\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=2\tGT\t0/1").unwrap();
        let mut observations = GeneObservations::new("CYP2C19");
        assert!(extract_record(&record, &mut observations));
        assert_eq!(observations.matched_records(), 1);
        assert_eq!(labels(&observations), vec!["*1", "*2"]);
        assert!(observations.rsids().contains("rs4244285"));
    }

    #[test]
    fn test_extract_record_other_gene() {
        let record = VariantRecord::from_line("chr22\t1\trs3892097\tC\tT\t.\tPASS\tGENE=CYP2D6;STAR=*4\tGT\t1/1").unwrap();
        let mut observations = GeneObservations::new("CYP2C19");
        assert!(!extract_record(&record, &mut observations));
        assert_eq!(observations.matched_records(), 0);
        assert!(observations.star_alleles().is_empty());
        assert!(observations.rsids().is_empty());
        assert_eq!(observations.other_genes().iter().collect::<Vec<_>>(), vec!["CYP2D6"]);
    }

    #[test]
    fn test_extract_record_case_sensitive() {
        let record = VariantRecord::from_line("chr10\t1\trs1\tG\tA\t.\tPASS\tGENE=cyp2c19;STAR=*2").unwrap();
        let mut observations = GeneObservations::new("CYP2C19");
        assert!(!extract_record(&record, &mut observations));
    }

    #[test]
    fn test_extract_record_no_gene() {
        let record = VariantRecord::from_line("chr10\t1\trs1\tG\tA\t.\tPASS\tSTAR=*2").unwrap();
        let mut observations = GeneObservations::new("CYP2C19");
        assert!(!extract_record(&record, &mut observations));
        assert!(observations.other_genes().is_empty());
    }

    #[test]
    fn test_extract_record_no_star() {
        // rsID is collected even without a star allele
        let record = VariantRecord::from_line("chr10\t1\trs12769205\tA\tG\t.\tPASS\tGENE=CYP2C19\tGT\t0/1").unwrap();
        let mut observations = GeneObservations::new("CYP2C19");
        assert!(extract_record(&record, &mut observations));
        assert!(observations.star_alleles().is_empty());
        assert_eq!(observations.rsids().len(), 1);
    }

    #[test]
    fn test_extract_record_malformed_gt() {
        let record = VariantRecord::from_line("chr10\t1\trs1\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*2\tGT\t0/1/1").unwrap();
        let mut observations = GeneObservations::new("CYP2C19");
        assert!(extract_record(&record, &mut observations));
        assert!(observations.star_alleles().is_empty());
        assert_eq!(observations.rsids().len(), 1);
    }

    #[test]
    fn test_extract_gene() {
        let text = "##fileformat=VCFv4.2\n\
            chr10\t1\trs12248560\tC\tT\t.\tPASS\tGENE=CYP2C19;STAR=*17\tGT\t0/1\n\
            chr10\t2\trs4244285\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*2\tGT\t0/0\n\
            chr10\t2\trs4244285\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*2\tGT\t0/0\n\
            chr22\t3\trs3892097\tC\tT\t.\tPASS\tGENE=CYP2D6;STAR=*4\tGT\t1/1\n\
            chr10\t4\t.\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*3\n";
        let observations = extract_gene(RecordScanner::new(text), "CYP2C19");
        assert_eq!(observations.gene(), "CYP2C19");
        assert_eq!(observations.matched_records(), 4);
        assert_eq!(labels(&observations), vec!["*1", "*17", "*1", "*1", "*1", "*1", "*3"]);
        assert_eq!(observations.rsids().iter().collect::<Vec<_>>(), vec!["rs12248560", "rs4244285"]);
        assert_eq!(observations.other_genes().len(), 1);
    }
}
