//! Mode sweep export: `rayNumber,n,omega_p,frequency` without header.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::{Exporter, create_file};
use crate::sim::dataset::Record;

pub struct MagneticFieldExporter;

impl Exporter for MagneticFieldExporter {
    fn dump(&self, path: &Path, records: &[Record]) -> Result<()> {
        let mut writer = create_file(path)?;
        for r in records {
            writeln!(
                writer,
                "{:.1},{:.6},{:.3},{:.1}",
                r.ray_number as f64, r.n_squared, r.plasma_frequency, r.frequency
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_records;

    #[test]
    fn test_fixed_precision_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xmode.csv");
        MagneticFieldExporter.dump(&path, &test_records::sample()[..1]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "1.0,0.900000,17800000.000,5000000.0\n");
    }
}
