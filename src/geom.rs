pub mod plane;
pub mod point;
pub mod rotation;
pub mod vector;
pub mod vector2;

/// Geometric precision
const EPS: f64 = 1e-13;
