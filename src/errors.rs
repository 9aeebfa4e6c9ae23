
/// Whether a failure is the caller's fault or ours
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, strum_macros::Display)]
pub enum ErrorClass {
    /// Bad gene, drug, or file contents
    #[strum(to_string = "client error")]
    Client,
    /// Anything that is not attributable to the input
    #[strum(to_string = "internal error")]
    Internal
}

/// Errors that can be produced by the analysis pipeline, these result in a failure state for one drug
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("gene {gene} is not in the supported gene registry")]
    UnsupportedGene { gene: String },
    #[error("drug {drug:?} has no required-gene mapping")]
    UnmappedDrug { drug: String },
    #[error("no records annotated with GENE={gene} were found")]
    NoMatchingVariants { gene: String },
    #[error("no star alleles were provided to resolve a diplotype")]
    EmptyAlleles
}

impl AnalysisError {
    /// Classification used when reporting the error to the user
    pub fn class(&self) -> ErrorClass {
        match self {
            AnalysisError::UnsupportedGene { .. } |
            AnalysisError::UnmappedDrug { .. } |
            AnalysisError::NoMatchingVariants { .. } => ErrorClass::Client,
            AnalysisError::EmptyAlleles => ErrorClass::Internal
        }
    }
}

/// Per-record problems; these are always recovered by skipping the record (or part of it)
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("expected at least {expected} tab-separated columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("malformed genotype call {call:?}")]
    MalformedGenotype { call: String }
}
