use crate::Vector;

/// Defines how rays reflect off layers.
pub trait ReflectionModel {
    /// Computes the reflected direction given incident direction and layer normal.
    fn reflect(&self, incident: Vector, normal: Vector) -> Vector;
}

/// Defines how rays are transmitted through a layer boundary.
pub trait RefractionModel {
    /// Computes the transmitted direction for the index ratio `n1 / n2`.
    ///
    /// Returns `None` if no transmitted wave exists (total internal reflection).
    fn refract(&self, incident: Vector, normal: Vector, ratio: f64) -> Option<Vector>;
}

/// Perfect specular (mirror) reflection.
pub struct Specular;

impl ReflectionModel for Specular {
    fn reflect(&self, incident: Vector, normal: Vector) -> Vector {
        // Upward waves meet the layer from below, so the facing normal flips.
        let facing = if incident.dot(normal) > 0. {
            -normal
        } else {
            normal
        };
        let dot = incident.dot(facing);
        incident - 2.0 * dot * facing
    }
}

/// Vector form of Snell's law.
pub struct Snell;

impl RefractionModel for Snell {
    fn refract(&self, incident: Vector, normal: Vector, ratio: f64) -> Option<Vector> {
        let d = incident.normalize()?;
        let n = normal.normalize()?;
        if !ratio.is_finite() {
            return None;
        }

        let vertical = d.dot(n);
        let cos_i = vertical.abs();
        let radicand = 1. - ratio.powi(2) * (1. - cos_i.powi(2));
        if radicand < 0. {
            return None;
        }

        let k = ratio * cos_i - radicand.sqrt();
        let transmitted = if vertical > 0. {
            d * ratio - n * k
        } else {
            d * ratio + n * k
        };
        transmitted.normalize()
    }
}
