//! Thread-safe accumulation of interaction records with periodic flushing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Serialize;

use crate::Point;
use crate::io::Exporter;
use crate::sim::tracer::ray::Ray;

/// Default number of buffered records above which the dataset is flushed.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 100_000;

/// What a ray ran into at a recorded point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionType {
    /// Escaped the scene or stopped at the hop limit
    None,
    Terrain,
    Ionosphere,
}

impl CollisionType {
    /// Numeric code used by column-oriented formats.
    pub fn code(self) -> u8 {
        match self {
            CollisionType::None => 0,
            CollisionType::Terrain => 1,
            CollisionType::Ionosphere => 2,
        }
    }
}

/// Snapshot of a ray at one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub ray_number: usize,
    pub position: Point,
    pub n_squared: f64,
    pub electron_number_density: f64,
    pub plasma_frequency: f64,
    pub theta_0: f64,
    pub azimuth_0: f64,
    pub frequency: f64,
    pub signal_power: f64,
    pub range_delay: f64,
    pub phase_advance: f64,
    pub time_delay: f64,
    pub time_of_flight: f64,
    pub beacon_id: usize,
    pub collision_type: CollisionType,
}

impl Record {
    /// Snapshot of the ray as it currently is, without layer data.
    pub fn from_ray(ray: &Ray, collision_type: CollisionType) -> Self {
        Self {
            ray_number: ray.ray_number,
            position: ray.origin,
            n_squared: ray.previous_refractive_index.powi(2),
            electron_number_density: 0.,
            plasma_frequency: 0.,
            theta_0: ray.original_angle,
            azimuth_0: ray.original_azimuth,
            frequency: ray.frequency,
            signal_power: ray.signal_power,
            range_delay: ray.range_delay,
            phase_advance: ray.phase_advance,
            time_delay: ray.time_delay,
            time_of_flight: ray.time_of_flight,
            beacon_id: ray.origin_beacon_id,
            collision_type,
        }
    }

    /// Adds the plasma state of the layer the ray interacted with.
    pub fn with_layer(
        mut self,
        n_squared: f64,
        electron_number_density: f64,
        plasma_frequency: f64,
    ) -> Self {
        self.n_squared = n_squared;
        self.electron_number_density = electron_number_density;
        self.plasma_frequency = plasma_frequency;
        self
    }
}

/// Path of the `index`-th flush of a dataset written to `path`.
///
/// The first flush goes to `path` itself, later ones to `stem.<index>.ext`.
pub fn numbered_path(path: &Path, index: usize) -> PathBuf {
    if index == 0 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}.{}", stem, index),
    };
    path.with_file_name(name)
}

#[derive(Default)]
struct Buffer {
    records: Vec<Record>,
    flushes: usize,
    flushed_records: usize,
}

/// Shared record buffer of a simulation run.
///
/// Buffering, threshold check, export and clearing all happen under one lock,
/// so no record is lost or written twice regardless of how many workers record.
pub struct Dataset {
    buffer: Mutex<Buffer>,
    exporter: Box<dyn Exporter>,
    path: PathBuf,
    threshold: usize,
}

impl Dataset {
    pub fn new(exporter: Box<dyn Exporter>, path: impl Into<PathBuf>, threshold: usize) -> Self {
        Self {
            buffer: Mutex::new(Buffer::default()),
            exporter,
            path: path.into(),
            threshold,
        }
    }

    /// Appends one record, flushing the buffer once it exceeds the threshold.
    pub fn record(&self, record: Record) -> Result<()> {
        let mut buffer = self.buffer.lock();
        buffer.records.push(record);
        if buffer.records.len() > self.threshold {
            self.flush_locked(&mut buffer)?;
        }
        Ok(())
    }

    /// Writes out everything still buffered.
    ///
    /// A run that never flushed still produces its (possibly empty) output file.
    pub fn final_flush(&self) -> Result<()> {
        let mut buffer = self.buffer.lock();
        if !buffer.records.is_empty() || buffer.flushes == 0 {
            self.flush_locked(&mut buffer)?;
        }
        Ok(())
    }

    /// Records waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.buffer.lock().records.len()
    }

    /// Records written out so far.
    pub fn flushed(&self) -> usize {
        self.buffer.lock().flushed_records
    }

    /// Files written so far.
    pub fn files(&self) -> Vec<PathBuf> {
        let flushes = self.buffer.lock().flushes;
        (0..flushes).map(|i| numbered_path(&self.path, i)).collect()
    }

    /// Exports and clears the buffer. A batch that fails to export is dropped
    /// with the error, so the buffer never grows past the threshold.
    fn flush_locked(&self, buffer: &mut Buffer) -> Result<()> {
        let path = numbered_path(&self.path, buffer.flushes);
        tracing::debug!(records = buffer.records.len(), path = %path.display(), "Flushing dataset");
        let written = self.exporter.dump(&path, &buffer.records);
        let count = buffer.records.len();
        buffer.records.clear();
        written.with_context(|| format!("Dropped {} records that could not be written", count))?;
        buffer.flushes += 1;
        buffer.flushed_records += count;
        Ok(())
    }
}

/// Number of completed traces, shared by all workers.
#[derive(Default)]
pub struct TraceCounter {
    count: Mutex<usize>,
}

impl TraceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        *self.count.lock() += 1;
    }

    pub fn get(&self) -> usize {
        *self.count.lock()
    }
}
