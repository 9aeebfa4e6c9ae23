
use log::trace;
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;

use crate::errors::RecordError;

/// Number of mandatory columns in a VCF data row (CHROM through INFO)
pub const MIN_VCF_COLUMNS: usize = 8;

/// One parsed VCF data row, borrowed from the input text.
/// These are short-lived; they exist only until the extractor has looked at them.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantRecord<'a> {
    /// chromosome of the variant
    chrom: &'a str,
    /// position as written in the file, we never validate it against a reference
    position: &'a str,
    /// variant ID, often an rsID or "."
    variant_id: &'a str,
    /// ref allele
    reference: &'a str,
    /// alt allele(s)
    alternate: &'a str,
    /// QUAL column
    qual: &'a str,
    /// FILTER column
    filter: &'a str,
    /// raw INFO column
    info: &'a str,
    /// FORMAT column, if present
    format: Option<&'a str>,
    /// all sample columns after FORMAT
    samples: Vec<&'a str>
}

impl<'a> VariantRecord<'a> {
    /// Splits a single non-header line into columns.
    /// # Arguments
    /// * `line` - the line without its trailing newline
    /// # Errors
    /// * if there are fewer than 8 tab-separated columns
    pub fn from_line(line: &'a str) -> Result<VariantRecord<'a>, RecordError> {
        let columns: Vec<&'a str> = line.split('\t').collect();
        if columns.len() < MIN_VCF_COLUMNS {
            return Err(RecordError::TooFewColumns { expected: MIN_VCF_COLUMNS, found: columns.len() });
        }

        Ok(VariantRecord {
            chrom: columns[0],
            position: columns[1],
            variant_id: columns[2],
            reference: columns[3],
            alternate: columns[4],
            qual: columns[5],
            filter: columns[6],
            info: columns[7],
            format: columns.get(8).copied(),
            samples: columns.iter().skip(MIN_VCF_COLUMNS + 1).copied().collect()
        })
    }

    /// Parses the INFO column into KEY -> VALUE pairs.
    /// Entries without an `=` (flags) are ignored, and if a key is repeated then the last value wins.
    pub fn annotations(&self) -> HashMap<&'a str, &'a str> {
        let mut annotations: HashMap<&'a str, &'a str> = Default::default();
        for item in self.info.split(';') {
            if let Some((key, value)) = item.split_once('=') {
                annotations.insert(key.trim(), value.trim());
            }
        }
        annotations
    }

    /// Returns the rsID for this record if the ID column carries one
    pub fn rsid(&self) -> Option<&'a str> {
        if self.variant_id.starts_with("rs") {
            Some(self.variant_id)
        } else {
            None
        }
    }

    /// Returns the GT value of the first sample, if the record has one.
    /// A FORMAT column without GT, or a sample that is shorter than FORMAT, both count as no call.
    pub fn genotype_call(&self) -> Option<&'a str> {
        let format = self.format?;
        let sample = self.samples.first()?;
        let gt_index = format.split(':').position(|key| key == "GT")?;
        sample.split(':').nth(gt_index)
    }

    // getters
    pub fn chrom(&self) -> &'a str {
        self.chrom
    }

    pub fn position(&self) -> &'a str {
        self.position
    }

    pub fn variant_id(&self) -> &'a str {
        self.variant_id
    }

    pub fn reference(&self) -> &'a str {
        self.reference
    }

    pub fn alternate(&self) -> &'a str {
        self.alternate
    }

    pub fn qual(&self) -> &'a str {
        self.qual
    }

    pub fn filter(&self) -> &'a str {
        self.filter
    }

    pub fn info(&self) -> &'a str {
        self.info
    }

    pub fn samples(&self) -> &[&'a str] {
        &self.samples
    }
}

/// Counts collected while scanning a VCF
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScanStats {
    /// data rows that were split successfully
    pub records_parsed: usize,
    /// data rows with too few columns
    pub records_skipped: usize
}

/// Lazy, single-pass scanner over the text of a VCF.
/// Header/comment lines and blank lines are skipped, and rows with fewer than 8 columns are silently dropped.
pub struct RecordScanner<'a> {
    /// remaining lines of the input
    lines: std::str::Lines<'a>,
    /// running counts
    stats: ScanStats
}

impl<'a> RecordScanner<'a> {
    pub fn new(text: &'a str) -> RecordScanner<'a> {
        RecordScanner {
            lines: text.lines(),
            stats: ScanStats::default()
        }
    }

    /// Counts for everything scanned so far
    pub fn stats(&self) -> ScanStats {
        self.stats
    }
}

impl<'a> Iterator for RecordScanner<'a> {
    type Item = VariantRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            // stray carriage returns and padding around the row are not part of any column
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }

            match VariantRecord::from_line(line) {
                Ok(record) => {
                    self.stats.records_parsed += 1;
                    return Some(record);
                },
                Err(e) => {
                    trace!("Skipping malformed VCF row: {e}");
                    self.stats.records_skipped += 1;
                }
            }
        }
        None
    }
}
