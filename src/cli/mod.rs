
/// the main CLI module
pub mod core;
/// the analyze CLI subcommand for classifying drug risk from a VCF
pub mod analyze;
/// The build CLI subcommand for writing the built-in rule table
pub mod table_build;
/// The table-stat CLI subcommand for summarizing a rule table
pub mod table_stat;
