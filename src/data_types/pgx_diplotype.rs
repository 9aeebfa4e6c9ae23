
use std::collections::BTreeSet;

use log::trace;
use serde::Serialize;

use crate::data_types::star_allele::StarAllele;
use crate::errors::AnalysisError;

/// Contains all the information related to a single gene's diplotype result
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Diplotype {
    /// short string for haplotype 1
    hap1: String,
    /// short string for haplotype 2
    hap2: String,
    /// combination diplotype call
    diplotype: String
}

impl Diplotype {
    pub fn new(hap1: &str, hap2: &str) -> Diplotype {
        Diplotype {
            hap1: hap1.to_string(),
            hap2: hap2.to_string(),
            diplotype: format!("{hap1}/{hap2}")
        }
    }

    /// The homozygous wild-type diplotype, "*1/*1"
    pub fn wild_type() -> Diplotype {
        let wild_type = StarAllele::wild_type();
        Diplotype::new(wild_type.as_str(), wild_type.as_str())
    }

    // getters
    pub fn hap1(&self) -> &str {
        &self.hap1
    }

    pub fn hap2(&self) -> &str {
        &self.hap2
    }

    pub fn diplotype(&self) -> &str {
        &self.diplotype
    }
}

impl std::fmt::Display for Diplotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.diplotype)
    }
}

/// Reduces every star allele observed for a gene to one canonical diplotype.
/// Distinct alleles are sorted lexicographically; if more than two remain, the wild type is dropped in favor of the variants.
/// A single remaining allele is reported as homozygous, otherwise the first two sorted alleles are used.
/// The result is always in sorted order, so it can be used as a rule table key directly.
/// # Arguments
/// * `alleles` - all alleles decoded for the gene, in any order and with repeats
/// # Errors
/// * if `alleles` is empty
pub fn resolve_diplotype(alleles: &[StarAllele]) -> Result<Diplotype, AnalysisError> {
    let mut unique: BTreeSet<&StarAllele> = alleles.iter().collect();
    trace!("Distinct alleles: {:?}", unique);

    if unique.len() > 2 {
        unique.retain(|allele| !allele.is_wild_type());
    }

    let mut sorted = unique.into_iter();
    match (sorted.next(), sorted.next()) {
        (Some(hap1), Some(hap2)) => Ok(Diplotype::new(hap1.as_str(), hap2.as_str())),
        (Some(hap), None) => Ok(Diplotype::new(hap.as_str(), hap.as_str())),
        _ => Err(AnalysisError::EmptyAlleles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stars(labels: &[&str]) -> Vec<StarAllele> {
        labels.iter().map(|l| StarAllele::parse(l).unwrap()).collect()
    }

    fn resolve(labels: &[&str]) -> String {
        resolve_diplotype(&stars(labels)).unwrap().diplotype().to_string()
    }

    #[test]
    fn test_diplotype() {
        let hap1 = "A";
        let hap2 = "B";
        let diplotype = Diplotype::new(hap2, hap1);
        assert_eq!(diplotype.diplotype(), "B/A");
        assert_eq!(diplotype.hap1(), "B");
        assert_eq!(diplotype.hap2(), "A");
        // order is kept as given, canonical order is the resolver's job
        assert_ne!(diplotype, Diplotype::new(hap1, hap2));
        assert_eq!(diplotype.to_string(), "B/A");
    }

    #[test]
    fn test_wild_type() {
        let diplotype = Diplotype::wild_type();
        assert_eq!(diplotype.diplotype(), "*1/*1");
        assert_eq!(diplotype, Diplotype::new("*1", "*1"));
    }

    #[test]
    fn test_resolve_homozygous() {
        assert_eq!(resolve(&["*2", "*2"]), "*2/*2");
        assert_eq!(resolve(&["*2"]), "*2/*2");
        assert_eq!(resolve(&["*1", "*1"]), "*1/*1");
    }

    #[test]
    fn test_resolve_heterozygous() {
        assert_eq!(resolve(&["*1", "*17"]), "*1/*17");
        assert_eq!(resolve(&["*17", "*1"]), "*1/*17");
        assert_eq!(resolve(&["*2", "*17"]), "*17/*2");
    }

    #[test]
    fn test_resolve_order_independent() {
        assert_eq!(resolve(&["*2", "*1"]), resolve(&["*1", "*2"]));
        assert_eq!(resolve(&["*3", "*1", "*2", "*1"]), resolve(&["*2", "*1", "*3"]));
    }

    #[test]
    fn test_resolve_drops_wild_type() {
        // two het calls at different positions, variants win
        assert_eq!(resolve(&["*1", "*2", "*1", "*3"]), "*2/*3");
        // more than two variants, the first two in sorted order are kept
        assert_eq!(resolve(&["*4", "*2", "*3", "*1"]), "*2/*3");
        assert_eq!(resolve(&["*10", "*4", "*41"]), "*10/*4");
    }

    #[test]
    fn test_resolve_always_two() {
        let cases: Vec<Vec<&str>> = vec![
            vec!["*1"], vec!["*2", "*1"], vec!["*1", "*2", "*3"], vec!["*5", "*5", "*5"], vec!["*2", "*3", "*4", "*5"]
        ];
        for case in cases {
            let diplotype = resolve_diplotype(&stars(&case)).unwrap();
            assert_eq!(diplotype.diplotype().split('/').count(), 2);
            assert!(diplotype.hap1() <= diplotype.hap2());
        }
    }

    #[test]
    fn test_resolve_empty() {
        assert_eq!(resolve_diplotype(&[]), Err(AnalysisError::EmptyAlleles));
    }
}
