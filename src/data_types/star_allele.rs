
use serde::Serialize;

use crate::errors::RecordError;

/// The reference / wild-type allele for every gene in the registry
pub const WILD_TYPE_ALLELE: &str = "*1";

/// A normalized star allele, always carrying the leading "*".
/// Ordering is plain lexicographic on the string, so "*17" sorts before "*2".
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct StarAllele(String);

impl StarAllele {
    /// Normalizes an allele label, adding the "*" prefix if it is missing.
    /// Returns None if the label is empty after trimming.
    /// # Arguments
    /// * `label` - the raw label, e.g. "*2" or "17"
    pub fn parse(label: &str) -> Option<StarAllele> {
        let label = label.trim();
        if label.is_empty() || label == "*" {
            None
        } else if label.starts_with('*') {
            Some(StarAllele(label.to_string()))
        } else {
            Some(StarAllele(format!("*{label}")))
        }
    }

    pub fn wild_type() -> StarAllele {
        StarAllele(WILD_TYPE_ALLELE.to_string())
    }

    pub fn is_wild_type(&self) -> bool {
        self.0 == WILD_TYPE_ALLELE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StarAllele {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One allele index inside a GT call
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenotypeMarker {
    /// "0", the reference allele
    Reference,
    /// any other index, the variant carried by the record
    Alternate,
    /// ".", no call
    Missing
}

/// A parsed GT value such as "0/1" or "1|0"
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenotypeCall {
    /// markers in the order they were written
    markers: Vec<GenotypeMarker>,
    /// true if the "|" separator was used
    is_phased: bool
}

impl GenotypeCall {
    /// Splits on "/" if present, otherwise on "|".
    /// # Arguments
    /// * `call` - the raw GT value
    /// # Errors
    /// * if there are zero or more than two markers, or a marker is empty
    pub fn parse(call: &str) -> Result<GenotypeCall, RecordError> {
        let call = call.trim();
        let is_phased = !call.contains('/') && call.contains('|');
        let separator = if is_phased { '|' } else { '/' };

        let markers: Vec<GenotypeMarker> = call.split(separator)
            .map(|marker| match marker {
                "0" => Ok(GenotypeMarker::Reference),
                "." => Ok(GenotypeMarker::Missing),
                "" => Err(RecordError::MalformedGenotype { call: call.to_string() }),
                _ => Ok(GenotypeMarker::Alternate)
            })
            .collect::<Result<_, _>>()?;

        if markers.is_empty() || markers.len() > 2 {
            return Err(RecordError::MalformedGenotype { call: call.to_string() });
        }

        Ok(GenotypeCall {
            markers,
            is_phased
        })
    }

    pub fn markers(&self) -> &[GenotypeMarker] {
        &self.markers
    }

    pub fn is_phased(&self) -> bool {
        self.is_phased
    }
}

/// Expands a record's genotype call into concrete star alleles.
/// With no call, the record's star allele is reported once.
/// Otherwise "0" becomes the wild type, missing markers are dropped, and anything else is the record's allele.
/// The output keeps the order of the call; nothing is sorted here.
/// # Arguments
/// * `opt_call` - the GT value, if the record had one
/// * `star_allele` - the normalized allele named by the record
/// # Errors
/// * if the call is present but malformed
pub fn decode_genotype(opt_call: Option<&str>, star_allele: &StarAllele) -> Result<Vec<StarAllele>, RecordError> {
    let call = match opt_call {
        Some(c) if !c.trim().is_empty() => GenotypeCall::parse(c)?,
        _ => return Ok(vec![star_allele.clone()])
    };

    let alleles = call.markers().iter()
        .filter_map(|marker| match marker {
            GenotypeMarker::Reference => Some(StarAllele::wild_type()),
            GenotypeMarker::Alternate => Some(star_allele.clone()),
            GenotypeMarker::Missing => None
        })
        .collect();
    Ok(alleles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(label: &str) -> StarAllele {
        StarAllele::parse(label).unwrap()
    }

    fn labels(alleles: &[StarAllele]) -> Vec<&str> {
        alleles.iter().map(|a| a.as_str()).collect()
    }

    #[test]
    fn test_star_allele_parse() {
        assert_eq!(star("*2").as_str(), "*2");
        assert_eq!(star("17").as_str(), "*17");
        assert_eq!(star(" 3A ").as_str(), "*3A");
        assert_eq!(StarAllele::parse(""), None);
        assert_eq!(StarAllele::parse("  "), None);
        assert_eq!(StarAllele::parse("*"), None);
        assert!(star("1").is_wild_type());
        assert!(!star("*17").is_wild_type());
        assert_eq!(StarAllele::wild_type(), star("*1"));
        assert_eq!(star("*28").to_string(), "*28");
    }

    #[test]
    fn test_star_allele_ordering() {
        // lexicographic, not numeric
        let mut alleles = vec![star("*2"), star("*17"), star("*1")];
        alleles.sort();
        assert_eq!(labels(&alleles), vec!["*1", "*17", "*2"]);
    }

    #[test]
    fn test_genotype_call_parse() {
        let call = GenotypeCall::parse("0/1").unwrap();
        assert_eq!(call.markers(), &[GenotypeMarker::Reference, GenotypeMarker::Alternate]);
        assert!(!call.is_phased());

        let call = GenotypeCall::parse("1|0").unwrap();
        assert_eq!(call.markers(), &[GenotypeMarker::Alternate, GenotypeMarker::Reference]);
        assert!(call.is_phased());

        let call = GenotypeCall::parse("./.").unwrap();
        assert_eq!(call.markers(), &[GenotypeMarker::Missing, GenotypeMarker::Missing]);

        // haploid
        let call = GenotypeCall::parse("2").unwrap();
        assert_eq!(call.markers(), &[GenotypeMarker::Alternate]);

        assert!(GenotypeCall::parse("0/1/1").is_err());
        assert!(GenotypeCall::parse("0/").is_err());
        assert_eq!(GenotypeCall::parse("1||0"), Err(RecordError::MalformedGenotype { call: "1||0".to_string() }));
    }

    #[test]
    fn test_decode_hom_ref() {
        for label in ["*2", "*17", "*4", "*28"] {
            let decoded = decode_genotype(Some("0/0"), &star(label)).unwrap();
            assert_eq!(labels(&decoded), vec!["*1", "*1"]);
        }
    }

    #[test]
    fn test_decode_het() {
        for label in ["*2", "*17", "*4", "*28"] {
            let decoded = decode_genotype(Some("0/1"), &star(label)).unwrap();
            assert_eq!(labels(&decoded), vec!["*1", label]);
        }

        // order follows the call
        let decoded = decode_genotype(Some("1|0"), &star("*3")).unwrap();
        assert_eq!(labels(&decoded), vec!["*3", "*1"]);
    }

    #[test]
    fn test_decode_hom_alt() {
        let decoded = decode_genotype(Some("1/1"), &star("*2")).unwrap();
        assert_eq!(labels(&decoded), vec!["*2", "*2"]);

        // any non-zero index is the record's allele
        let decoded = decode_genotype(Some("1/2"), &star("*2")).unwrap();
        assert_eq!(labels(&decoded), vec!["*2", "*2"]);
    }

    #[test]
    fn test_decode_no_call() {
        let decoded = decode_genotype(None, &star("*17")).unwrap();
        assert_eq!(labels(&decoded), vec!["*17"]);

        let decoded = decode_genotype(Some(""), &star("*17")).unwrap();
        assert_eq!(labels(&decoded), vec!["*17"]);
    }

    #[test]
    fn test_decode_missing() {
        let decoded = decode_genotype(Some("./."), &star("*17")).unwrap();
        assert!(decoded.is_empty());

        let decoded = decode_genotype(Some("./1"), &star("*17")).unwrap();
        assert_eq!(labels(&decoded), vec!["*17"]);

        assert!(decode_genotype(Some("0/1/2"), &star("*17")).is_err());
    }
}
