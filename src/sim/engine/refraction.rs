//! Refractive index models of a cold magnetized plasma.

use serde::{Deserialize, Serialize};

use crate::Vector;
use crate::geom::vector2::Vector2;
use crate::sim::complex::complex_sqrt;

/// Which dispersion relation is used to report refractive indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefractiveModel {
    /// Cold, collisionless, non-magnetized plasma
    #[default]
    Simple,
    /// Appleton-Hartree with collisions and a background magnetic field
    Ahdr,
}

/// Uniform background magnetic field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticField {
    /// Field strength [T]
    pub strength: f64,
    /// Field direction (need not be normalized)
    pub direction: Vector,
}

/// Squared refractive index of a cold collisionless plasma.
///
/// `frequency` is the wave frequency [Hz], `plasma_frequency` is angular [rad/s].
/// A neutral medium always has index 1. The result is negative for evanescent waves.
pub fn refractive_index_squared_simple(frequency: f64, plasma_frequency: f64) -> f64 {
    if plasma_frequency == 0. {
        return 1.;
    }
    let omega = 2. * std::f64::consts::PI * frequency;
    1. - (plasma_frequency / omega).powi(2)
}

/// Squared real refractive index of both magnetoionic modes (Appleton-Hartree).
///
/// Returns `(mu_1^2, mu_2^2)` where the first component is the mode taken with
/// the positive square root of the discriminant (ordinary wave for perpendicular
/// propagation). Non-finite components are reported as 0.
///
/// * `frequency` - wave frequency [Hz]
/// * `plasma_frequency` - angular plasma frequency [rad/s]
/// * `collision_frequency` - electron-neutral collision frequency [1/s]
/// * `gyro_frequency` - electron angular gyrofrequency [rad/s]
/// * `angle_to_field` - angle between propagation and magnetic field [rad]
pub fn refractive_index_squared_ahdr(
    frequency: f64,
    plasma_frequency: f64,
    collision_frequency: f64,
    gyro_frequency: f64,
    angle_to_field: f64,
) -> Vector2 {
    let omega = 2. * std::f64::consts::PI * frequency;
    let x = (plasma_frequency / omega).powi(2);
    let y = gyro_frequency / omega;
    let z = collision_frequency / omega;
    let y_l = y * angle_to_field.cos();
    let y_t = y * angle_to_field.sin();

    // U / X with U = 1 - iZ
    let alpha = 1. / x;
    let beta = -z / x;
    // |U - X|^2
    let q = (1. - x).powi(2) + z.powi(2);

    // Y_T^2 / (2 X (U - X))
    let t_re = y_t.powi(2) * (1. - x) / (2. * x * q);
    let t_im = y_t.powi(2) * z / (2. * x * q);

    // Y_T^4 / (4 X^2 (U - X)^2) + Y_L^2 / X^2
    let w_re = y_t.powi(4) * ((1. - x).powi(2) - z.powi(2)) / (4. * x.powi(2) * q.powi(2))
        + (y_l / x).powi(2);
    let w_im = y_t.powi(4) * 2. * (1. - x) * z / (4. * x.powi(2) * q.powi(2));
    let root = complex_sqrt(w_re, w_im);

    let first = mode_index_squared(alpha - t_re + root.re, beta - t_im + root.im);
    let second = mode_index_squared(alpha - t_re - root.re, beta - t_im - root.im);
    Vector2::new(first, second)
}

/// Real part of n, squared, where n^2 = 1 - 1 / (m + i n_im).
fn mode_index_squared(m: f64, n_im: f64) -> f64 {
    let denom = m.powi(2) + n_im.powi(2);
    let n_squared = complex_sqrt(1. - m / denom, n_im / denom);
    let mu_squared = n_squared.re.powi(2);
    if mu_squared.is_finite() {
        mu_squared
    } else {
        0.
    }
}
