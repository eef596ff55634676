//! Legacy VTK polydata export: one polyline per ray.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::{Exporter, create_file};
use crate::sim::dataset::Record;

pub struct VtkExporter;

impl Exporter for VtkExporter {
    fn dump(&self, path: &Path, records: &[Record]) -> Result<()> {
        // Records of concurrent rays interleave; regroup them per ray keeping hop order.
        let mut rays: BTreeMap<usize, Vec<&Record>> = BTreeMap::new();
        for record in records {
            rays.entry(record.ray_number).or_default().push(record);
        }

        let mut writer = create_file(path)?;
        writeln!(writer, "# vtk DataFile Version 3.0")?;
        writeln!(writer, "{} rays", rays.len())?;
        writeln!(writer, "ASCII")?;
        writeln!(writer, "DATASET POLYDATA")?;

        writeln!(writer, "POINTS {} double", records.len())?;
        for record in rays.values().flatten() {
            let p = record.position;
            writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
        }

        let size: usize = rays.values().map(|hops| hops.len() + 1).sum();
        writeln!(writer, "LINES {} {}", rays.len(), size)?;
        let mut offset = 0;
        for hops in rays.values() {
            let ids: Vec<String> = (offset..offset + hops.len()).map(|i| i.to_string()).collect();
            writeln!(writer, "{} {}", hops.len(), ids.join(" "))?;
            offset += hops.len();
        }

        writeln!(writer, "POINT_DATA {}", records.len())?;
        writeln!(writer, "SCALARS signal_power double 1")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for record in rays.values().flatten() {
            writeln!(writer, "{}", record.signal_power)?;
        }

        writer.flush()?;
        Ok(())
    }
}
