//! Physical constants (SI units).

/// Speed of light in vacuum [m/s].
pub const C: f64 = 2.997_924_58e8;

/// Elementary charge [C].
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Electron rest mass [kg].
pub const ELECTRON_MASS: f64 = 9.109_383_7e-31;

/// Vacuum permittivity [F/m].
pub const PERMITTIVITY_VACUUM: f64 = 8.854_187_812_8e-12;

/// Default neutral atmosphere scale height [m] (Mars).
pub const NEUTRAL_SCALE_HEIGHT: f64 = 11.1e3;

/// Electron-neutral collision frequency extrapolated to the surface [1/s].
pub const SURFACE_COLLISION_FREQUENCY: f64 = 4.5e10;

/// Reference altitude [m] and e-folding height [m] of the collision frequency model.
pub const COLLISION_REFERENCE_ALTITUDE: f64 = 73e3;
pub const COLLISION_SCALE_HEIGHT: f64 = 6.2e3;

/// Altitude band [m] in which the collision frequency model is valid.
pub const COLLISION_MODEL_MIN_ALTITUDE: f64 = 30e3;
pub const COLLISION_MODEL_MAX_ALTITUDE: f64 = 200e3;

/// Ionospheric delay coefficient e^2 / (8 pi^2 eps0 m_e) [m^3/s^2].
pub const DELAY_COEFFICIENT: f64 = 40.3;

/// Height [m] above the terrain at which beacons are placed.
pub const BEACON_CLEARANCE: f64 = 2.0;
