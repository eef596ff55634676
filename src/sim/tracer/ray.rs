//! State of a single traced radio wave.

use crate::{Point, Vector};

/// What happened to the wave at its most recent layer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveBehaviour {
    /// No interaction yet, or the layer did not affect the wave
    #[default]
    None,
    Reflected,
    Refracted,
}

/// A radio ray traced from a beacon through the scene.
///
/// Launch parameters (`frequency`, `original_angle`, `original_azimuth`,
/// `origin_beacon_id`, `ray_number`) never change after creation. Delay
/// accumulators only grow and `signal_power` only falls while tracing.
#[derive(Debug, Clone)]
pub struct Ray {
    pub ray_number: usize,
    pub origin_beacon_id: usize,
    /// Current position
    pub origin: Point,
    /// Unit propagation direction
    pub direction: Vector,
    /// Wave frequency [Hz]
    pub frequency: f64,
    /// Launch angle from the local vertical [rad]
    pub original_angle: f64,
    /// Launch azimuth [rad]
    pub original_azimuth: f64,
    /// Signal power [dB]
    pub signal_power: f64,
    /// Refractive index of the last layer passed (1.0 = vacuum)
    pub previous_refractive_index: f64,
    pub behaviour: WaveBehaviour,
    /// Group range delay [m]
    pub range_delay: f64,
    /// Carrier phase advance [rad]
    pub phase_advance: f64,
    /// Group time delay [s]
    pub time_delay: f64,
    /// Geometric time of flight [s]
    pub time_of_flight: f64,
}

impl Ray {
    /// Creates a ray in vacuum.
    ///
    /// Returns `None` if the direction has zero length.
    pub fn new(ray_number: usize, origin: Point, direction: Vector, frequency: f64) -> Option<Self> {
        Some(Self {
            ray_number,
            origin_beacon_id: 0,
            origin,
            direction: direction.normalize()?,
            frequency,
            original_angle: 0.,
            original_azimuth: 0.,
            signal_power: 0.,
            previous_refractive_index: 1.,
            behaviour: WaveBehaviour::None,
            range_delay: 0.,
            phase_advance: 0.,
            time_delay: 0.,
            time_of_flight: 0.,
        })
    }

    /// Angular wave frequency [rad/s].
    pub fn angular_frequency(&self) -> f64 {
        2. * std::f64::consts::PI * self.frequency
    }

    /// Component of the direction along `vertical`.
    ///
    /// Positive for waves traveling upward through a layer with that normal.
    pub fn vertical_component(&self, vertical: Vector) -> f64 {
        self.direction.dot(vertical)
    }

    /// Moves the ray to `pt` and accounts the free-space travel time.
    pub fn advance_to(&mut self, pt: Point) {
        self.time_of_flight += self.origin.distance(&pt) / crate::sim::constants::C;
        self.origin = pt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ray_starts_in_vacuum() {
        let ray = Ray::new(1, Point::new(0., 0., 0.), Vector::new(0., 3., 0.), 5e6).unwrap();
        assert_eq!(ray.previous_refractive_index, 1.);
        assert_eq!(ray.behaviour, WaveBehaviour::None);
        assert!((ray.direction.length() - 1.).abs() < 1e-12);
        assert!(Ray::new(1, Point::new(0., 0., 0.), Vector::default(), 5e6).is_none());
    }

    #[test]
    fn test_advance_accumulates_time_of_flight() {
        let mut ray = Ray::new(1, Point::new(0., 0., 0.), Vector::new(0., 1., 0.), 5e6).unwrap();
        ray.advance_to(Point::new(0., 2.997_924_58e8, 0.));
        ray.advance_to(Point::new(0., 2. * 2.997_924_58e8, 0.));
        assert!((ray.time_of_flight - 2.).abs() < 1e-9);
    }
}
