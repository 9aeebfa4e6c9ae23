
use std::io::{BufWriter, Read, Write};
use std::fs::File;
use std::path::Path;

/// Opens a file for reading, transparently decompressing if the extension is ".gz"
/// # Arguments
/// * `filename` - the file path to open
/// # Errors
/// * if the file does not open properly
fn open_reader(filename: &Path) -> Result<Box<dyn Read>, Box<dyn std::error::Error>> {
    let fp: Box<dyn Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::read::MultiGzDecoder::new(
                File::open(filename)?
            )
        )
    } else {
        Box::new(File::open(filename)?)
    };
    Ok(fp)
}

/// Helper function that loads a file into some type, helpful generic
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file does not open properly
/// * if the deserialization throws errors
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let fp = open_reader(filename)?;
    let result: T = serde_json::from_reader(fp)?;
    Ok(result)
}

/// Reads an entire text file (e.g. a VCF) into memory as UTF-8.
/// # Arguments
/// * `filename` - the file path to open, ".gz" is decompressed
/// # Errors
/// * if the file does not open properly
/// * if the content is not valid UTF-8
pub fn load_text(filename: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let mut fp = open_reader(filename)?;
    let mut text = String::new();
    fp.read_to_string(&mut text)?;
    Ok(text)
}

/// This will save a generic serializable struct to JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to 
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file: Box<dyn std::io::Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn test_json_round_trip_gz() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data: BTreeMap<String, Vec<String>> = BTreeMap::from([
            ("CYP2C19".to_string(), vec!["*1".to_string(), "*17".to_string()])
        ]);

        for name in ["table.json", "table.json.gz"] {
            let filename = temp_dir.path().join(name);
            save_json(&data, &filename).unwrap();
            let loaded: BTreeMap<String, Vec<String>> = load_json(&filename).unwrap();
            assert_eq!(loaded, data);
        }
    }

    #[test]
    fn test_load_text() {
        let text = load_text(Path::new("test_data/scenario_a.vcf")).unwrap();
        assert!(text.starts_with("##fileformat=VCF"));
        assert!(text.contains("STAR=*2"));
    }

    #[test]
    fn test_load_text_missing() {
        assert!(load_text(Path::new("test_data/does_not_exist.vcf")).is_err());
    }
}
