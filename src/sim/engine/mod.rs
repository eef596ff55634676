//! Physics of a ray meeting an ionospheric layer.

pub mod attenuation;
pub mod delay;
pub mod reflection;
pub mod refraction;

use crate::error::PhysicsError;
use crate::sim::dataset::{CollisionType, Record};
use crate::sim::scene::ionosphere::{Ionosphere, gyro_frequency};
use crate::sim::tracer::ray::{Ray, WaveBehaviour};

use self::attenuation::{AttenuationModel, Collisional};
use self::reflection::{ReflectionModel, RefractionModel, Snell, Specular};
use self::refraction::{
    MagneticField, RefractiveModel, refractive_index_squared_ahdr, refractive_index_squared_simple,
};

/// Applies layer interactions to rays.
///
/// Stateless apart from its configuration, so one engine is shared by all workers.
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    /// Model used for the refractive index reported in records
    pub model: RefractiveModel,
    pub magnetic_field: Option<MagneticField>,
}

impl InteractionEngine {
    pub fn new(model: RefractiveModel, magnetic_field: Option<MagneticField>) -> Self {
        Self {
            model,
            magnetic_field,
        }
    }

    /// Full interaction of `ray` with `layer`: bend, attenuate, delay, record.
    ///
    /// Attenuation and delays use the geometry of the arriving wave, the
    /// direction is changed last. Fails only if the collision frequency
    /// cannot be modeled at the layer altitude.
    pub fn interact(&self, ray: &mut Ray, layer: &Ionosphere) -> Result<Record, PhysicsError> {
        let behaviour = self.determine_wave_behaviour(ray, layer);

        self.attenuate(ray, layer)?;
        let range = self.range_delay(ray, layer);
        let phase = self.phase_advance(ray, layer);
        let time = self.time_delay(ray, layer);
        accumulate(&mut ray.range_delay, range);
        accumulate(&mut ray.phase_advance, phase);
        accumulate(&mut ray.time_delay, time);
        let n_squared = self.refractive_index_squared(ray, layer)?;

        match behaviour {
            WaveBehaviour::Reflected => self.reflect(ray, layer),
            WaveBehaviour::Refracted => self.refract(ray, layer),
            WaveBehaviour::None => ray.behaviour = WaveBehaviour::None,
        }

        Ok(Record::from_ray(ray, CollisionType::Ionosphere).with_layer(
            n_squared,
            layer.electron_number_density(),
            layer.plasma_frequency(),
        ))
    }

    /// Decides whether the layer reflects or transmits the wave.
    ///
    /// Waves below the local plasma frequency cannot propagate and are
    /// reflected. Otherwise a wave entering a less dense (optically) medium
    /// at or beyond the critical angle is totally reflected.
    pub fn determine_wave_behaviour(&self, ray: &Ray, layer: &Ionosphere) -> WaveBehaviour {
        let omega = ray.angular_frequency();
        if omega < layer.plasma_frequency() {
            return WaveBehaviour::Reflected;
        }

        let n = self.refractive_index(ray, layer);
        let n_prev = ray.previous_refractive_index;
        let critical = (n.min(n_prev) / n.max(n_prev)).asin();
        let incident = layer.incident_angle(ray);
        if !(omega.is_finite() && critical.is_finite() && incident.is_finite()) {
            return WaveBehaviour::None;
        }

        if n_prev > n && incident >= critical {
            WaveBehaviour::Reflected
        } else {
            WaveBehaviour::Refracted
        }
    }

    /// Real refractive index of the layer used for ray bending (simple model).
    pub fn refractive_index(&self, ray: &Ray, layer: &Ionosphere) -> f64 {
        refractive_index_squared_simple(ray.frequency, layer.plasma_frequency())
            .max(0.)
            .sqrt()
    }

    /// Squared refractive index reported for the layer, per the configured model.
    ///
    /// With the AHDR model the first (ordinary) mode is reported.
    pub fn refractive_index_squared(
        &self,
        ray: &Ray,
        layer: &Ionosphere,
    ) -> Result<f64, PhysicsError> {
        match self.model {
            RefractiveModel::Simple => Ok(refractive_index_squared_simple(
                ray.frequency,
                layer.plasma_frequency(),
            )),
            RefractiveModel::Ahdr => {
                let (gyro, angle) = match &self.magnetic_field {
                    Some(field) => (
                        gyro_frequency(field.strength),
                        ray.direction
                            .angle(&field.direction)
                            .unwrap_or(layer.angle_to_mag_field),
                    ),
                    None => (0., layer.angle_to_mag_field),
                };
                let modes = refractive_index_squared_ahdr(
                    ray.frequency,
                    layer.plasma_frequency(),
                    layer.collision_frequency()?,
                    gyro,
                    angle,
                );
                Ok(modes.x)
            }
        }
    }

    /// Bends the ray into the layer following Snell's law.
    ///
    /// Falls back to reflection if no transmitted wave exists.
    pub fn refract(&self, ray: &mut Ray, layer: &Ionosphere) {
        let n = self.refractive_index(ray, layer);
        let ratio = ray.previous_refractive_index / n;
        match Snell.refract(ray.direction, layer.plane.normal, ratio) {
            Some(direction) => {
                ray.direction = direction;
                ray.previous_refractive_index = n;
                ray.behaviour = WaveBehaviour::Refracted;
            }
            None => self.reflect(ray, layer),
        }
    }

    /// Mirrors the ray direction about the layer.
    pub fn reflect(&self, ray: &mut Ray, layer: &Ionosphere) {
        ray.direction = Specular.reflect(ray.direction, layer.plane.normal);
        ray.behaviour = WaveBehaviour::Reflected;
    }

    /// Subtracts the collisional absorption across the layer from the signal power.
    pub fn attenuate(&self, ray: &mut Ray, layer: &Ionosphere) -> Result<(), PhysicsError> {
        let collision_frequency = layer.collision_frequency()?;
        let path_length = layer.layer_height * layer.incident_angle(ray).cos().abs();
        ray.signal_power += Collisional.loss(
            ray.angular_frequency(),
            layer.plasma_frequency(),
            collision_frequency,
            path_length,
        );
        Ok(())
    }

    /// Group range delay [m] added by crossing the layer.
    pub fn range_delay(&self, ray: &Ray, layer: &Ionosphere) -> f64 {
        delay::range_delay(layer.tec(), ray.frequency)
    }

    /// Carrier phase advance [rad] added by crossing the layer.
    pub fn phase_advance(&self, ray: &Ray, layer: &Ionosphere) -> f64 {
        delay::phase_advance(layer.tec(), ray.frequency)
    }

    /// Group time delay [s] added by crossing the layer.
    pub fn time_delay(&self, ray: &Ray, layer: &Ionosphere) -> f64 {
        delay::time_delay(layer.tec(), ray.frequency)
    }
}

/// Adds a delay term, ignoring values that would break monotonic growth.
fn accumulate(total: &mut f64, term: f64) {
    if term.is_finite() && term > 0. {
        *total += term;
    }
}
