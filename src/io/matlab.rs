//! Whitespace separated columns without header, loadable with Matlab's `load`.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::csv::format_row;
use super::{Exporter, create_file};
use crate::sim::dataset::Record;

pub struct MatlabExporter;

impl Exporter for MatlabExporter {
    fn dump(&self, path: &Path, records: &[Record]) -> Result<()> {
        let mut writer = create_file(path)?;
        for record in records {
            writeln!(writer, "{}", format_row(record, " "))?;
        }
        writer.flush()?;
        Ok(())
    }
}
