//! Comma separated export with a header row.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::{Exporter, create_file};
use crate::sim::dataset::Record;

pub(crate) const COLUMNS: [&str; 17] = [
    "rayNumber",
    "x",
    "y",
    "z",
    "nSquared",
    "electronNumberDensity",
    "plasmaFrequency",
    "theta0",
    "azimuth0",
    "frequency",
    "signalPower",
    "rangeDelay",
    "phaseAdvance",
    "timeDelay",
    "timeOfFlight",
    "beaconId",
    "collisionType",
];

/// Formats one record with `sep` between the columns listed in [`COLUMNS`].
pub(crate) fn format_row(r: &Record, sep: &str) -> String {
    [
        r.ray_number.to_string(),
        r.position.x.to_string(),
        r.position.y.to_string(),
        r.position.z.to_string(),
        r.n_squared.to_string(),
        r.electron_number_density.to_string(),
        r.plasma_frequency.to_string(),
        r.theta_0.to_string(),
        r.azimuth_0.to_string(),
        r.frequency.to_string(),
        r.signal_power.to_string(),
        r.range_delay.to_string(),
        r.phase_advance.to_string(),
        r.time_delay.to_string(),
        r.time_of_flight.to_string(),
        r.beacon_id.to_string(),
        r.collision_type.code().to_string(),
    ]
    .join(sep)
}

pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn dump(&self, path: &Path, records: &[Record]) -> Result<()> {
        let mut writer = create_file(path)?;
        writeln!(writer, "{}", COLUMNS.join(","))?;
        for record in records {
            writeln!(writer, "{}", format_row(record, ","))?;
        }
        writer.flush()?;
        Ok(())
    }
}
