/// Contains all the CLI related functionality
pub mod cli;
/// Contains the fixed registries and the static rule table
pub mod database;
/// Contains any specialized data types that are shared across the tooling
pub mod data_types;
/// Contains the pipeline that turns a VCF and a drug into a risk classification
pub mod diplotyper;
/// Errors surfaced by the analysis pipeline
pub mod errors;
/// Deterministic rule table lookups
pub mod evaluator;
/// Pulls per-gene star alleles and rsIDs out of parsed records
pub mod extractor;
/// Contains functionality for displaying rule table statistics
pub mod table_stat;
/// Contains generic utilities that are handy wrappers
pub mod util;
