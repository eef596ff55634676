//! Ionospheric layer patches and their plasma properties.

use crate::Vector;
use crate::error::PhysicsError;
use crate::geom::plane::Plane;
use crate::sim::constants::{
    COLLISION_MODEL_MAX_ALTITUDE, COLLISION_MODEL_MIN_ALTITUDE, COLLISION_REFERENCE_ALTITUDE,
    COLLISION_SCALE_HEIGHT, ELECTRON_MASS, ELEMENTARY_CHARGE, PERMITTIVITY_VACUUM,
    SURFACE_COLLISION_FREQUENCY,
};
use crate::sim::tracer::ray::Ray;

use super::grid::Cell;

/// Plasma frequency [rad/s] of an electron gas with density `n_e` [1/m^3].
pub fn plasma_frequency(n_e: f64) -> f64 {
    (n_e * ELEMENTARY_CHARGE.powi(2) / (ELECTRON_MASS * PERMITTIVITY_VACUUM)).sqrt()
}

/// Electron angular gyrofrequency [rad/s] in a field of `strength` [T].
pub fn gyro_frequency(strength: f64) -> f64 {
    ELEMENTARY_CHARGE * strength.abs() / ELECTRON_MASS
}

/// Electron-neutral collision frequency [1/s] at `altitude` [m].
///
/// Exponential fit to Nielsen (2007), figure 4. The fit is only valid
/// between 30 and 200 km; outside that band an error is returned.
pub fn collision_frequency_at(altitude: f64) -> Result<f64, PhysicsError> {
    if !(COLLISION_MODEL_MIN_ALTITUDE..=COLLISION_MODEL_MAX_ALTITUDE).contains(&altitude) {
        return Err(PhysicsError::CollisionFrequencyOutOfRange {
            altitude,
            min: COLLISION_MODEL_MIN_ALTITUDE,
            max: COLLISION_MODEL_MAX_ALTITUDE,
        });
    }
    Ok(SURFACE_COLLISION_FREQUENCY
        * (-(altitude - COLLISION_REFERENCE_ALTITUDE) / COLLISION_SCALE_HEIGHT).exp())
}

/// One planar patch of an ionospheric shell.
#[derive(Debug, Clone)]
pub struct Ionosphere {
    pub plane: Plane,
    /// Altitude above the planet surface [m]
    pub altitude: f64,
    /// Thickness of the shell represented by this patch [m]
    pub layer_height: f64,
    /// Angle between the patch normal and the sun direction [rad]
    pub solar_zenith_angle: f64,
    /// Angle between propagation and magnetic field [rad], used when no field is traced
    pub angle_to_mag_field: f64,
    /// Grid cell the patch covers, if it is part of a gridded shell
    pub cell: Option<Cell>,
    electron_number_density: f64,
    collision_frequency: Option<f64>,
}

impl Ionosphere {
    pub fn new(plane: Plane, altitude: f64, layer_height: f64) -> Self {
        Self {
            plane,
            altitude,
            layer_height,
            solar_zenith_angle: 0.,
            angle_to_mag_field: 0.,
            cell: None,
            electron_number_density: 0.,
            collision_frequency: None,
        }
    }

    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Sets the solar zenith angle from the direction towards the sun.
    pub fn with_sun_direction(mut self, sun: Vector) -> Self {
        self.solar_zenith_angle = self.plane.normal.angle(&sun).unwrap_or(0.);
        self
    }

    /// Adds a daytime Chapman profile to the electron density of this layer.
    ///
    /// Several profiles (e.g. M1 and M2 layers) can be superimposed into one
    /// patch. Patches on the night side (SZA >= 90 deg) are not ionized.
    pub fn superimpose_electron_number_density(
        &mut self,
        peak_density: f64,
        peak_altitude: f64,
        neutral_scale_height: f64,
    ) {
        let cos_sza = self.solar_zenith_angle.cos();
        if cos_sza <= 0. || neutral_scale_height <= 0. {
            return;
        }
        let h = (self.altitude - peak_altitude) / neutral_scale_height;
        let n_e = peak_density * (0.5 * (1. - h - (-h).exp() / cos_sza)).exp();
        if n_e.is_finite() && n_e > 0. {
            self.electron_number_density += n_e;
        }
    }

    /// Electron number density [1/m^3].
    pub fn electron_number_density(&self) -> f64 {
        self.electron_number_density
    }

    /// Sets the electron number density [1/m^3]; negative values are clamped to zero.
    pub fn set_electron_number_density(&mut self, n_e: f64) {
        self.electron_number_density = n_e.max(0.);
    }

    /// Plasma frequency [rad/s] at this layer.
    pub fn plasma_frequency(&self) -> f64 {
        plasma_frequency(self.electron_number_density)
    }

    /// Collision frequency [1/s], either set explicitly or modeled from altitude.
    pub fn collision_frequency(&self) -> Result<f64, PhysicsError> {
        match self.collision_frequency {
            Some(freq) => Ok(freq),
            None => collision_frequency_at(self.altitude),
        }
    }

    /// Overrides the collision frequency model.
    pub fn set_collision_frequency(&mut self, freq: f64) {
        self.collision_frequency = Some(freq);
    }

    /// Total electron content of the layer column [1/m^2].
    pub fn tec(&self) -> f64 {
        self.electron_number_density * self.layer_height
    }

    /// Angle [rad] between the ray direction and the layer normal, in [0, PI/2].
    pub fn incident_angle(&self, ray: &Ray) -> f64 {
        ray.direction.dot(self.plane.normal).abs().clamp(0., 1.).acos()
    }
}
