//! JSON export of records, one object per interaction.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::{Exporter, create_file};
use crate::sim::dataset::Record;

/// Writes records to a pretty-printed JSON array.
pub fn write_json(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = create_file(path)?;
    serde_json::to_writer_pretty(&mut writer, records)
        .with_context(|| format!("Failed to serialize records to: {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Serializes records to a JSON string.
pub fn to_json_string(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize records to string")
}

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn dump(&self, path: &Path, records: &[Record]) -> Result<()> {
        write_json(path, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_records;

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rays.json");
        JsonExporter.dump(&path, &test_records::sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 5);
        assert_eq!(array[0]["rayNumber"], 1);
        assert_eq!(array[0]["collisionType"], "ionosphere");
        assert_eq!(array[0]["position"]["y"], 1000.0);
    }

    #[test]
    fn test_json_string_of_empty_batch() {
        let s = to_json_string(&[]).unwrap();
        assert_eq!(s, "[]");
    }
}
