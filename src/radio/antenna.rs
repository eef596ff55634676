//! Beacon antenna radiation patterns.

use serde::{Deserialize, Serialize};

/// Peak gain of a short dipole relative to an isotropic radiator.
pub const SHORT_DIPOLE_GAIN: f64 = 1.76;

/// Antenna of a beacon, selected by the `type` key of its config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Antenna {
    /// Radiates equally in all directions
    #[serde(rename_all = "camelCase")]
    IsotropicAntenna {
        #[serde(default)]
        nominal_signal_power: f64,
    },
    /// Power pattern `G cos^2(elevation)`
    #[serde(rename_all = "camelCase")]
    ShortDipoleAntenna {
        #[serde(default)]
        nominal_signal_power: f64,
    },
}

impl Default for Antenna {
    fn default() -> Self {
        Antenna::IsotropicAntenna {
            nominal_signal_power: 0.,
        }
    }
}

impl Antenna {
    pub fn nominal_signal_power(&self) -> f64 {
        match self {
            Antenna::IsotropicAntenna {
                nominal_signal_power,
            }
            | Antenna::ShortDipoleAntenna {
                nominal_signal_power,
            } => *nominal_signal_power,
        }
    }

    /// Signal power radiated towards `azimuth`, `elevation` (degrees).
    pub fn signal_power_at(&self, _azimuth: f64, elevation: f64) -> f64 {
        match self {
            Antenna::IsotropicAntenna {
                nominal_signal_power,
            } => *nominal_signal_power,
            Antenna::ShortDipoleAntenna {
                nominal_signal_power,
            } => nominal_signal_power * SHORT_DIPOLE_GAIN * elevation.to_radians().cos().powi(2),
        }
    }
}
