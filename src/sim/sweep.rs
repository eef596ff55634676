//! Inclusive parameter ranges and their expansion into ray launches.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Inclusive `min..=max` range walked in steps of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub step: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, step: f64, max: f64) -> Self {
        Self { min, step, max }
    }

    /// Range holding the single value `value`.
    pub fn single(value: f64) -> Self {
        Self::new(value, 1., value)
    }

    /// Checks `step > 0` and `min <= max`; `key` names the range in the error.
    pub fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(ConfigError::invalid(key, "bounds must be finite"));
        }
        if !(self.step > 0.) {
            return Err(ConfigError::invalid(key, format!("step must be > 0, got {}", self.step)));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(
                key,
                format!("min ({}) must not exceed max ({})", self.min, self.max),
            ));
        }
        Ok(())
    }

    /// Number of values in the range.
    ///
    /// Tolerates rounding so that a `max` reached by whole steps is included.
    pub fn len(&self) -> usize {
        if !(self.step > 0.) || self.min > self.max {
            return 0;
        }
        ((self.max - self.min) / self.step + 1e-9).floor() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All values `min + i * step` not exceeding `max`.
    pub fn values(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }
}

/// Launch parameters of one ray, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub azimuth: f64,
    pub frequency: f64,
    /// Angle from the local vertical
    pub elevation: f64,
}

/// The cartesian product of azimuths, frequencies and elevation angles.
#[derive(Debug, Clone)]
pub struct Sweep {
    pub azimuth: Range,
    pub frequency: Range,
    pub elevation: Range,
}

impl Sweep {
    pub fn len(&self) -> usize {
        self.azimuth.len() * self.frequency.len() * self.elevation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expands the sweep, azimuth outermost and elevation innermost.
    pub fn launches(&self) -> Vec<Launch> {
        let mut launches = Vec::with_capacity(self.len());
        for azimuth in self.azimuth.values() {
            for frequency in self.frequency.values() {
                for elevation in self.elevation.values() {
                    launches.push(Launch {
                        azimuth,
                        frequency,
                        elevation,
                    });
                }
            }
        }
        launches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_values() {
        assert_eq!(Range::new(4e6, 1e6, 6e6).values(), vec![4e6, 5e6, 6e6]);
        assert_eq!(Range::new(0., 90., 270.).len(), 4);
        assert_eq!(Range::new(0., 10., 65.).values().last(), Some(&60.));
        assert_eq!(Range::single(3.).values(), vec![3.]);
    }

    #[test]
    fn test_fractional_steps_reach_max() {
        let r = Range::new(0., 0.1, 0.3);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn test_validate() {
        assert!(Range::new(0., 1., 1.).validate("SZA").is_ok());
        assert!(Range::new(0., 0., 1.).validate("SZA").is_err());
        assert!(Range::new(0., -1., 1.).validate("SZA").is_err());
        assert!(Range::new(2., 1., 1.).validate("SZA").is_err());
        assert!(Range::new(0., 1., f64::NAN).validate("SZA").is_err());
        let err = Range::new(0., 0., 1.).validate("frequencies").unwrap_err();
        assert!(err.to_string().contains("frequencies"));
    }

    #[test]
    fn test_invalid_range_is_empty() {
        assert!(Range::new(0., 0., 1.).is_empty());
        assert!(Range::new(2., 1., 1.).values().is_empty());
    }

    #[test]
    fn test_sweep_order() {
        let sweep = Sweep {
            azimuth: Range::new(0., 90., 90.),
            frequency: Range::new(5e6, 1e6, 6e6),
            elevation: Range::new(0., 30., 30.),
        };
        let launches = sweep.launches();
        assert_eq!(launches.len(), 8);
        assert_eq!(sweep.len(), 8);
        assert_eq!(
            launches[1],
            Launch {
                azimuth: 0.,
                frequency: 5e6,
                elevation: 30.
            }
        );
        assert_eq!(launches[2].frequency, 6e6);
        assert_eq!(launches[4].azimuth, 90.);
    }
}
