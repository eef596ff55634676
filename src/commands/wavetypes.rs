//! Dispersion curves of the ordinary and extraordinary waves.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::io::{Exporter, MagneticFieldExporter};
use crate::sim::dataset::{CollisionType, Record};
use crate::sim::engine::refraction::refractive_index_squared_ahdr;
use crate::sim::tracer::ray::Ray;
use crate::{Point, Vector};

/// Angular plasma frequency of the sampled medium [rad/s].
pub const PLASMA_FREQUENCY: f64 = 2.8e7;

/// Upper end of the frequency sweep [Hz].
pub const MAX_FREQUENCY: u64 = 30_000_000;

/// Sweep frequencies [Hz]: the increment doubles every 512 increments.
pub fn frequencies() -> Vec<f64> {
    let mut out = Vec::new();
    let mut increment = 1;
    let mut f: u64 = 0;
    while f < MAX_FREQUENCY {
        out.push(f as f64);
        if f % (increment * 512) == 0 {
            increment *= 2;
        }
        f += increment;
    }
    out
}

/// One curve sample stored as a record.
fn sample(index: usize, frequency: f64, n_squared: f64) -> Option<Record> {
    let ray = Ray::new(index + 1, Point::default(), Vector::new(0., 1., 0.), frequency)?;
    Some(Record::from_ray(&ray, CollisionType::None).with_layer(n_squared, 0., PLASMA_FREQUENCY))
}

/// Ordinary wave without field, then both modes across a perpendicular field.
pub fn mode_curves(gyro_frequency: f64) -> (Vec<Record>, Vec<Record>, Vec<Record>) {
    let mut ordinary = Vec::new();
    let mut first = Vec::new();
    let mut second = Vec::new();

    for (i, f) in frequencies().into_iter().enumerate() {
        let o = refractive_index_squared_ahdr(f, PLASMA_FREQUENCY, 0., 0., 0.);
        let x = refractive_index_squared_ahdr(
            f,
            PLASMA_FREQUENCY,
            0.,
            gyro_frequency,
            std::f64::consts::FRAC_PI_2,
        );
        ordinary.extend(sample(i, f, o.x));
        first.extend(sample(i, f, x.x));
        second.extend(sample(i, f, x.y));
    }
    (ordinary, first, second)
}

/// Writes the three curves into `dir` and returns the written files.
pub fn run(dir: &Path, gyro_frequency: f64) -> Result<Vec<PathBuf>> {
    let (ordinary, first, second) = mode_curves(gyro_frequency);
    let exporter = MagneticFieldExporter;

    let mut files = Vec::new();
    for (name, records) in [
        ("wavetypes_o.csv", &ordinary),
        ("wavetypes_x1.csv", &first),
        ("wavetypes_x2.csv", &second),
    ] {
        let path = dir.join(name);
        exporter.dump(&path, records)?;
        files.push(path);
    }
    tracing::warn!(samples = ordinary.len(), dir = %dir.display(), "Wave type curves written");
    Ok(files)
}
