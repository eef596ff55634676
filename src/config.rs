//! Application and scenario configuration documents.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Vector;
use crate::error::ConfigError;
use crate::radio::Antenna;
use crate::sim::constants::NEUTRAL_SCALE_HEIGHT;
use crate::sim::dataset::DEFAULT_FLUSH_THRESHOLD;
use crate::sim::engine::refraction::MagneticField;
use crate::sim::framework::context::DEFAULT_MAX_HOPS;
use crate::sim::sweep::Range;

/// Reads and parses a JSON document.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Run-wide settings (`-c/--config`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Number of tracing threads
    pub parallelism: usize,
    /// Number of times the whole sweep is repeated on a fresh scene
    pub iterations: usize,
    /// Angular size [rad] of scene patches
    pub angular_step_size: f64,
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    #[serde(default = "default_flush_threshold")]
    pub dataset_flush_threshold: usize,
    /// Wave frequencies [Hz]
    pub frequencies: Range,
    /// Launch angles from the local vertical [deg]
    #[serde(rename = "SZA", alias = "elevation")]
    pub sza: Range,
    /// Launch azimuths [deg]
    pub azimuth: Range,
    pub beacons: Vec<BeaconConfig>,
    #[serde(default)]
    pub magnetic_field: Option<MagneticFieldConfig>,
    /// Seed of the density variability; drawn from entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconConfig {
    /// Height above the terrain [m]
    #[serde(default)]
    pub altitude: f64,
    /// [deg]
    #[serde(default)]
    pub latitude_offset: f64,
    /// [deg]
    #[serde(default)]
    pub longitude_offset: f64,
    #[serde(default)]
    pub antenna: Antenna,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagneticFieldConfig {
    /// [T]
    pub strength: f64,
    pub direction: [f64; 3],
}

impl MagneticFieldConfig {
    pub fn field(&self) -> MagneticField {
        let [dx, dy, dz] = self.direction;
        MagneticField {
            strength: self.strength,
            direction: Vector::new(dx, dy, dz),
        }
    }
}

/// Command line values that replace config values when positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub parallelism: usize,
    pub iterations: usize,
    pub fmin: f64,
    pub fstep: f64,
    pub fmax: f64,
}

impl AppConfig {
    /// Loads and validates the application config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = load(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if overrides.parallelism > 0 {
            self.parallelism = overrides.parallelism;
        }
        if overrides.iterations > 0 {
            self.iterations = overrides.iterations;
        }
        if overrides.fmin > 0. {
            self.frequencies.min = overrides.fmin;
        }
        if overrides.fstep > 0. {
            self.frequencies.step = overrides.fstep;
        }
        if overrides.fmax > 0. {
            self.frequencies.max = overrides.fmax;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallelism < 1 {
            return Err(ConfigError::invalid("parallelism", "must be at least 1"));
        }
        if self.iterations < 1 {
            return Err(ConfigError::invalid("iterations", "must be at least 1"));
        }
        if !(self.angular_step_size > 0. && self.angular_step_size.is_finite()) {
            return Err(ConfigError::invalid(
                "angularStepSize",
                format!("must be > 0, got {}", self.angular_step_size),
            ));
        }
        if self.dataset_flush_threshold < 1 {
            return Err(ConfigError::invalid("datasetFlushThreshold", "must be at least 1"));
        }
        self.frequencies.validate("frequencies")?;
        self.sza.validate("SZA")?;
        self.azimuth.validate("azimuth")?;
        if self.beacons.is_empty() {
            return Err(ConfigError::invalid("beacons", "at least one beacon is required"));
        }
        if let Some(field) = &self.magnetic_field
            && field.field().direction.normalize().is_none()
        {
            return Err(ConfigError::invalid("magneticField.direction", "must not be zero"));
        }
        Ok(())
    }
}

/// Planet and ionosphere description (positional scenario file).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    /// Planet radius [m]
    pub radius: f64,
    /// Direction towards the sun in scene coordinates
    #[serde(default = "default_sun_direction")]
    pub sun_direction: [f64; 3],
    pub ionosphere: IonosphereConfig,
}

fn default_sun_direction() -> [f64; 3] {
    [0., 1., 0.]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IonosphereConfig {
    /// Layer altitudes [m]; the step is also the layer thickness
    pub altitude: Range,
    /// Relative standard deviation of the peak densities
    #[serde(default)]
    pub electron_density_variability: f64,
    pub layers: Vec<LayerConfig>,
}

/// One Chapman layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    /// [1/m^3]
    pub peak_density: f64,
    /// [m]
    pub peak_altitude: f64,
    /// [m]
    #[serde(default = "default_neutral_scale_height")]
    pub neutral_scale_height: f64,
}

fn default_neutral_scale_height() -> f64 {
    NEUTRAL_SCALE_HEIGHT
}

impl ScenarioConfig {
    /// Loads and validates a scenario.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = load(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn sun_direction(&self) -> Vector {
        let [dx, dy, dz] = self.sun_direction;
        Vector::new(dx, dy, dz)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0. && self.radius.is_finite()) {
            return Err(ConfigError::invalid("radius", format!("must be > 0, got {}", self.radius)));
        }
        if self.sun_direction().normalize().is_none() {
            return Err(ConfigError::invalid("sunDirection", "must not be zero"));
        }
        self.ionosphere.altitude.validate("ionosphere.altitude")?;
        if !(self.ionosphere.electron_density_variability >= 0.) {
            return Err(ConfigError::invalid(
                "ionosphere.electronDensityVariability",
                "must not be negative",
            ));
        }
        for layer in &self.ionosphere.layers {
            if !(layer.neutral_scale_height > 0.) {
                return Err(ConfigError::invalid(
                    "ionosphere.layers.neutralScaleHeight",
                    "must be > 0",
                ));
            }
            if !(layer.peak_density >= 0.) {
                return Err(ConfigError::invalid("ionosphere.layers.peakDensity", "must not be negative"));
            }
        }
        Ok(())
    }
}
