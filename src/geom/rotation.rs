use crate::Point;
use crate::Vector;
use ndarray as nd;

/// Principal axes of the planet-centered frame.
///
/// `Y` is the local vertical at zero latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vector {
        match self {
            Axis::X => Vector::new(1., 0., 0.),
            Axis::Y => Vector::new(0., 1., 0.),
            Axis::Z => Vector::new(0., 0., 1.),
        }
    }
}

/// Calculate rotation matrix for an axis `u` and angle `phi` (radians).
///
/// A rotation in 3D can be described with an axis and angle around that axis.
/// The axis is normalized before use; a zero-length axis yields the identity.
///
/// Rodrigues' formula (numerically stable):
/// https://en.wikipedia.org/wiki/Rodrigues%27_rotation_formula
pub fn rotation_matrix(u: &Vector, phi: f64) -> nd::Array2<f64> {
    let Some(u) = u.normalize() else {
        return nd::Array::eye(3);
    };

    let w: nd::Array2<f64> = nd::arr2(&[[0., -u.dz, u.dy], [u.dz, 0., -u.dx], [-u.dy, u.dx, 0.]]);

    nd::Array::eye(3) + phi.sin() * &w + (2. * (phi / 2.).sin().powi(2)) * w.dot(&w)
}

/// Rotation matrix around one of the principal axes.
pub fn axis_rotation(axis: Axis, phi: f64) -> nd::Array2<f64> {
    rotation_matrix(&axis.unit(), phi)
}

/// Applies the rotation matrix `rot` to a vector.
pub fn rotate_vector(rot: &nd::Array2<f64>, v: Vector) -> Vector {
    let out = rot.dot(&nd::arr1(&[v.dx, v.dy, v.dz]));
    Vector::new(out[0], out[1], out[2])
}

/// Applies the rotation matrix `rot` to a point (rotation about the origin).
pub fn rotate_point(rot: &nd::Array2<f64>, pt: Point) -> Point {
    let v = rotate_vector(rot, Vector::from_a_point(pt));
    Point::new(v.dx, v.dy, v.dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_axis_rotation() {
        let rot = axis_rotation(Axis::Z, FRAC_PI_2);
        let v = rotate_vector(&rot, Vector::new(1., 0., 0.));
        assert!((v.dx - 0.).abs() < 1e-12);
        assert!((v.dy - 1.).abs() < 1e-12);
        assert!((v.dz - 0.).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let rot = rotation_matrix(&Vector::new(1., 2., 3.), 0.7);
        let v = Vector::new(-3., 0.5, 2.);
        let rotated = rotate_vector(&rot, v);
        assert!((rotated.length() - v.length()).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_point_composed() {
        // Latitude then longitude rotation of the north pole stays on the sphere.
        let rot = axis_rotation(Axis::X, 0.3).dot(&axis_rotation(Axis::Z, 1.1));
        let p = rotate_point(&rot, Point::new(0., 10., 0.));
        assert!((p.distance(&Point::new(0., 0., 0.)) - 10.).abs() < 1e-9);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        let rot = rotation_matrix(&Vector::default(), 1.0);
        let v = rotate_vector(&rot, Vector::new(1., 2., 3.));
        assert!(v.is_close(&Vector::new(1., 2., 3.)));
    }
}
