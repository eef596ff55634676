//! Latitude/longitude grid tiling the planet sphere.
//!
//! Node `(lat, lon)` has the outward normal `R_x(lat) R_z(lon) (0, 1, 0)`.
//! Every direction from the planet center belongs to exactly one cell: the
//! node nearest to it in latitude and (circularly) in longitude. Shell patches
//! only accept hits inside their own cell, so the patches of one altitude form
//! a closed faceted shell that a ray crosses once.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::Vector;
use crate::geom::rotation::{Axis, axis_rotation, rotate_vector};

/// Indices of a grid node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub lat: usize,
    pub lon: usize,
}

#[derive(Debug, Clone)]
pub struct Grid {
    step: f64,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
}

impl Grid {
    /// Grid with spacing `step` [rad] in both angles.
    ///
    /// Latitudes are symmetric about the equator so that a node sits at (0, 0).
    pub fn new(step: f64) -> Self {
        let k = (FRAC_PI_2 / step + 1e-9).floor() as i64;
        let latitudes = (-k..=k).map(|i| i as f64 * step).collect();
        let longitudes = (0..)
            .map(|i| i as f64 * step)
            .take_while(|lon| *lon < 2. * PI)
            .collect();
        Self {
            step,
            latitudes,
            longitudes,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cells with their unit outward normals, latitude-major.
    pub fn cells(&self) -> Vec<(Cell, Vector)> {
        let mut cells = Vec::with_capacity(self.len());
        for (i, lat) in self.latitudes.iter().enumerate() {
            let latitude = axis_rotation(Axis::X, *lat);
            for (j, lon) in self.longitudes.iter().enumerate() {
                let rotation = latitude.dot(&axis_rotation(Axis::Z, *lon));
                let normal = rotate_vector(&rotation, Axis::Y.unit());
                cells.push((Cell { lat: i, lon: j }, normal));
            }
        }
        cells
    }

    /// Cell containing `direction` (seen from the planet center).
    ///
    /// Returns `None` for a zero or non-finite direction.
    pub fn cell_of(&self, direction: Vector) -> Option<Cell> {
        let u = direction.normalize()?;
        let last_lon = *self.longitudes.last()?;

        // u = (-sin lon, cos lon cos lat, cos lon sin lat)
        let lat = if u.dy == 0. && u.dz == 0. {
            0.
        } else {
            (u.dz / u.dy).atan()
        };
        let cos_lon = u.dy * lat.cos() + u.dz * lat.sin();
        let lon = (-u.dx).atan2(cos_lon).rem_euclid(2. * PI);

        let k = (self.latitudes.len() / 2) as f64;
        let lat_index = ((lat / self.step).round() + k).clamp(0., 2. * k) as usize;

        let mut lon_index = (lon / self.step).round() as usize;
        if lon_index >= self.longitudes.len() {
            // Between the last node and the wrap-around to the first one
            lon_index = if lon - last_lon < 2. * PI - lon {
                self.longitudes.len() - 1
            } else {
                0
            };
        }

        Some(Cell {
            lat: lat_index,
            lon: lon_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_covers_sphere() {
        let grid = Grid::new(0.5);
        // 7 latitudes x 13 longitudes
        assert_eq!(grid.len(), 7 * 13);
        let cells = grid.cells();
        assert_eq!(cells.len(), grid.len());
        assert!(cells.iter().all(|(_, n)| (n.length() - 1.).abs() < 1e-12));
        assert!(cells.iter().any(|(_, n)| n.is_close(&Vector::new(0., 1., 0.))));
    }

    #[test]
    fn test_node_normal_is_in_its_own_cell() {
        for step in [0.5, 0.3, 0.05] {
            let grid = Grid::new(step);
            for (cell, normal) in grid.cells() {
                assert_eq!(grid.cell_of(normal), Some(cell), "step {} cell {:?}", step, cell);
            }
        }
    }

    #[test]
    fn test_nearby_directions_stay_in_the_cell() {
        let grid = Grid::new(0.1);
        let (cell, normal) = grid.cells()[grid.len() / 2 + 3];
        let nudged = normal + Vector::new(0.01, -0.01, 0.02);
        assert_eq!(grid.cell_of(nudged), Some(cell));
    }

    #[test]
    fn test_every_direction_has_a_cell() {
        let grid = Grid::new(0.3);
        for v in [
            Vector::new(1., 0., 0.),
            Vector::new(-1., 0., 0.),
            Vector::new(0., 0., 1.),
            Vector::new(0., -1., 0.),
            Vector::new(0.3, -0.2, -0.9),
        ] {
            let cell = grid.cell_of(v).unwrap();
            assert!(cell.lat < 2 * (FRAC_PI_2 / 0.3) as usize + 1);
            assert!(cell.lon < (2. * PI / 0.3).ceil() as usize);
        }
        assert!(grid.cell_of(Vector::default()).is_none());
    }
}
