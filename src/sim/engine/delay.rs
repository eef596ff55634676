//! First-order ionospheric delays of a wave crossing a column of plasma.
//!
//! All take the total electron content `tec` [1/m^2] and wave `frequency` [Hz].

use std::f64::consts::PI;

use crate::sim::constants::{C, DELAY_COEFFICIENT};

/// Group range delay [m].
pub fn range_delay(tec: f64, frequency: f64) -> f64 {
    DELAY_COEFFICIENT * tec / frequency.powi(2)
}

/// Carrier phase advance [rad].
pub fn phase_advance(tec: f64, frequency: f64) -> f64 {
    2. * PI * DELAY_COEFFICIENT * tec / (C * frequency)
}

/// Group time delay [s].
pub fn time_delay(tec: f64, frequency: f64) -> f64 {
    DELAY_COEFFICIENT * tec / (C * frequency.powi(2))
}
