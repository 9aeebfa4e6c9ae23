
/// Contains the representation of a final diplotype and the resolver that builds it
pub mod pgx_diplotype;
/// Contains the output structures: profile, risk classification, and the JSON envelope
pub mod pharmaguard_json;
/// Contains star allele normalization and genotype decoding
pub mod star_allele;
/// Contains the VCF record scanner
pub mod variant_record;
