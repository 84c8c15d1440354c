use anyhow::{Context, Result};
use linkscout_search::person::PersonRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Parse the input file into person records.
pub fn read_records(path: &Path) -> Result<Vec<PersonRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| {
        format!(
            "input file is not a JSON array of person records: {}",
            path.display()
        )
    })
}

/// Write all records at once, pretty-printed with a 4-space indent and
/// non-ASCII characters preserved.
pub fn write_records(path: &Path, records: &[PersonRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    records
        .serialize(&mut serializer)
        .context("failed to serialize output records")?;
    drop(serializer);

    writer
        .flush()
        .with_context(|| format!("failed to write output file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_four_space_indent_and_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let record = PersonRecord {
            name: Some("Zoë Müller".to_string()),
            search_results: Some(vec!["https://www.linkedin.com/in/zoë".to_string()]),
            ..Default::default()
        };
        write_records(&path, &[record]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n    {"), "array items indented by 4: {raw}");
        assert!(raw.contains("\n        \"name\": \"Zoë Müller\""), "{raw}");
        assert!(!raw.contains("\\u"), "non-ASCII must not be escaped: {raw}");

        let back = read_records(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name.as_deref(), Some("Zoë Müller"));
    }

    #[test]
    fn empty_run_writes_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_records(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let err = read_records(Path::new("/nonexistent/people.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read input file"));
    }

    #[test]
    fn non_array_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        fs::write(&path, "{\"name\": \"not an array\"}").unwrap();
        assert!(read_records(&path).is_err());
    }
}
