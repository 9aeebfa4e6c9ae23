
/// Constants that are hard-coded: the gene registry, drug routing, and the built-in rules
pub mod db_const;
/// Contains the rule table loaded once at startup
pub mod rule_table;
