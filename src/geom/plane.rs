//! Planar patches and ray-plane intersection.
//!
//! A patch stands in for a small segment of a spherical shell (terrain or an
//! ionospheric layer). It is bounded by the circumscribed disc of a
//! `size` x `size` square around its center.

use crate::{Point, Vector};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

/// Below this `|normal . direction|` a ray is considered parallel to the plane.
const PARALLEL_TOLERANCE: f64 = 1e-10;

/// Hits closer than this distance [m] to the ray origin are ignored
/// to avoid re-hitting the surface the ray is leaving.
pub const MIN_HIT_DISTANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal (outward local vertical for shell patches)
    pub normal: Vector,
    /// Center of the patch
    pub center: Point,
    /// Edge length of the patch [m]
    pub size: f64,
}

impl Plane {
    /// Creates a patch. Returns `None` if the normal has zero length.
    pub fn new(normal: Vector, center: Point, size: f64) -> Option<Self> {
        Some(Self {
            normal: normal.normalize()?,
            center,
            size,
        })
    }

    /// Radius of the disc bounding this patch.
    pub fn radius(&self) -> f64 {
        self.size * FRAC_1_SQRT_2
    }

    /// Returns true if a point lying on the plane is within the patch bounds.
    pub fn contains(&self, pt: Point) -> bool {
        self.within(pt, self.radius())
    }

    fn within(&self, pt: Point, radius: f64) -> bool {
        let offset = pt - self.center;
        let in_plane = offset - self.normal * offset.dot(self.normal);
        in_plane.length() <= radius
    }

    /// Calculates the intersection of a ray with this patch.
    ///
    /// Returns `Some((t, point))` where `t` is the distance along the
    /// (normalized) direction. Only intersections in front of the origin
    /// (`t >= MIN_HIT_DISTANCE`) and inside the patch bounds are reported.
    pub fn intersect(&self, origin: Point, direction: Vector) -> Option<(f64, Point)> {
        self.intersect_within(origin, direction, self.radius())
    }

    /// Like [`Plane::intersect`], but bounded by a disc of `radius` around the center.
    pub fn intersect_within(&self, origin: Point, direction: Vector, radius: f64) -> Option<(f64, Point)> {
        let dir = direction.normalize()?;

        let denom = self.normal.dot(dir);
        if denom.abs() < PARALLEL_TOLERANCE {
            return None; // Ray parallel to plane
        }

        // Plane: n . (p - c) = 0, ray: p = o + t * d
        // => t = n . (c - o) / (n . d)
        let t = self.normal.dot(self.center - origin) / denom;
        if t < MIN_HIT_DISTANCE {
            return None;
        }

        let point = origin + dir * t;
        if self.within(point, radius) {
            Some((t, point))
        } else {
            None
        }
    }
}
