use crate::sim::constants::C;

/// Defines how signal power is lost while crossing a layer.
pub trait AttenuationModel {
    /// Power change [dB] over `path_length` [m]. Never positive.
    ///
    /// * `omega` - angular wave frequency [rad/s]
    /// * `plasma_frequency` - angular plasma frequency [rad/s]
    /// * `collision_frequency` - electron-neutral collision frequency [1/s]
    fn loss(
        &self,
        omega: f64,
        plasma_frequency: f64,
        collision_frequency: f64,
        path_length: f64,
    ) -> f64;
}

/// Absorption by electron-neutral collisions (non-deviative).
pub struct Collisional;

impl AttenuationModel for Collisional {
    fn loss(
        &self,
        omega: f64,
        plasma_frequency: f64,
        collision_frequency: f64,
        path_length: f64,
    ) -> f64 {
        let wp2 = plasma_frequency.powi(2);
        let mu = (1. - wp2 / omega.powi(2)).sqrt();
        let kappa = -(wp2 * collision_frequency) / (2. * C * mu * (omega.powi(2) + collision_frequency.powi(2)));
        let loss = 20. * std::f64::consts::LOG10_E * kappa * path_length;

        if loss.is_finite() { loss.min(0.) } else { 0. }
    }
}
