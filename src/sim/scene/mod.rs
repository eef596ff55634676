//! Scene: the ordered set of geometry patches of one simulation iteration.

pub mod geometry;
pub mod grid;
pub mod ionosphere;
pub mod terrain;

use crate::{Point, Vector};

pub use geometry::Geometry;
pub use grid::{Cell, Grid};
pub use ionosphere::Ionosphere;
pub use terrain::Terrain;

/// Nearest intersection of a ray with the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the geometry in insertion order
    pub index: usize,
    /// Distance from the ray origin [m]
    pub distance: f64,
    pub point: Point,
}

/// Ordered collection of geometry patches.
///
/// The scene is built once per iteration and is read-only while rays are traced,
/// so it can be shared by all workers.
#[derive(Debug, Default)]
pub struct Scene {
    geometries: Vec<Geometry>,
    grid: Option<Grid>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene whose patches may be bound to cells of `grid`.
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            geometries: Vec::new(),
            grid: Some(grid),
        }
    }

    pub fn add(&mut self, geometry: impl Into<Geometry>) {
        self.geometries.push(geometry.into());
    }

    pub fn get(&self, index: usize) -> Option<&Geometry> {
        self.geometries.get(index)
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Finds the closest patch hit by a ray starting at `origin`.
    ///
    /// `exclude` skips the patch the ray is currently leaving. Among patches
    /// at equal distance the one added first wins. Returns `None` if the ray
    /// escapes the scene.
    ///
    /// A patch bound to a grid cell is hit only where the direction of the hit
    /// point from the planet center falls into that cell.
    pub fn intersect(&self, origin: Point, direction: Vector, exclude: Option<usize>) -> Option<Hit> {
        let mut closest: Option<Hit> = None;

        for (index, geometry) in self.geometries.iter().enumerate() {
            if exclude == Some(index) {
                continue;
            }
            if let Some((distance, point)) = self.hit_patch(geometry, origin, direction) {
                match closest {
                    None => closest = Some(Hit { index, distance, point }),
                    Some(best) if distance < best.distance => {
                        closest = Some(Hit { index, distance, point });
                    }
                    _ => {}
                }
            }
        }

        closest
    }

    fn hit_patch(&self, geometry: &Geometry, origin: Point, direction: Vector) -> Option<(f64, Point)> {
        let plane = geometry.plane();
        match (geometry.cell(), &self.grid) {
            (Some(cell), Some(grid)) => {
                // Edge cells of the grid reach well past the patch disc
                let (distance, point) = plane.intersect_within(origin, direction, 3. * plane.radius())?;
                (grid.cell_of(Vector::from_a_point(point)) == Some(cell)).then_some((distance, point))
            }
            _ => plane.intersect(origin, direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::plane::Plane;

    fn horizontal(height: f64, size: f64) -> Plane {
        Plane::new(Vector::new(0., 1., 0.), Point::new(0., height, 0.), size).unwrap()
    }

    #[test]
    fn test_nearest_hit() {
        let mut scene = Scene::new();
        scene.add(Ionosphere::new(horizontal(10., 4.), 10., 1.));
        scene.add(Terrain::new(horizontal(0., 4.)));
        scene.add(Ionosphere::new(horizontal(5., 4.), 5., 1.));

        let hit = scene
            .intersect(Point::new(0., 1., 0.), Vector::new(0., 1., 0.), None)
            .unwrap();
        assert_eq!(hit.index, 2);
        assert!((hit.distance - 4.).abs() < 1e-9);

        let hit = scene
            .intersect(Point::new(0., 1., 0.), Vector::new(0., -1., 0.), None)
            .unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_tie_is_broken_by_insertion_order() {
        let mut scene = Scene::new();
        scene.add(Terrain::new(horizontal(3., 4.)));
        scene.add(Ionosphere::new(horizontal(3., 4.), 3., 1.));
        scene.add(Terrain::new(horizontal(3., 8.)));

        let hit = scene
            .intersect(Point::new(0., 0., 0.), Vector::new(0., 1., 0.), None)
            .unwrap();
        assert_eq!(hit.index, 0);

        let hit = scene
            .intersect(Point::new(0., 0., 0.), Vector::new(0., 1., 0.), Some(0))
            .unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_escape() {
        let mut scene = Scene::new();
        scene.add(Terrain::new(horizontal(0., 4.)));
        assert!(scene
            .intersect(Point::new(0., 1., 0.), Vector::new(0., 1., 0.), None)
            .is_none());
    }

    /// One shell of radius `r` over a grid of spacing `step`, each patch bound to its cell.
    fn shell(step: f64, r: f64) -> Scene {
        let grid = Grid::new(step);
        let mut scene = Scene::with_grid(grid.clone());
        for (cell, normal) in grid.cells() {
            let center = Point::new(0., 0., 0.) + normal * r;
            let plane = Plane::new(normal, center, step * r).unwrap();
            scene.add(Terrain::new(plane).with_cell(cell));
        }
        scene
    }

    #[test]
    fn test_gridded_shell_is_crossed_once() {
        let scene = shell(0.05, 1e3);
        for direction in [
            Vector::new(0., 1., 0.),
            Vector::new(0.7, 0.7, 0.1),
            Vector::new(-0.3, 0.2, 0.9),
            Vector::new(0.05, -1., 0.4),
        ] {
            let origin = Point::new(10., 20., -5.);
            let first = scene.intersect(origin, direction, None).unwrap();
            let second = scene.intersect(first.point, direction, Some(first.index));
            assert!(second.is_none(), "{:?} crossed twice", direction);
        }
    }

    #[test]
    fn test_cell_rejects_hits_outside() {
        let grid = Grid::new(0.5);
        let (cell, normal) = grid.cells()[0];
        let plane = Plane::new(normal, Point::new(0., 0., 0.) + normal * 10., 5.).unwrap();
        let mut scene = Scene::with_grid(grid.clone());
        scene.add(Terrain::new(plane).with_cell(cell));
        // Straight along the node normal: inside the cell
        assert!(scene.intersect(Point::new(0., 0., 0.), normal, None).is_some());
        // Any other node direction lies in another cell
        let (_, other) = grid.cells()[1];
        assert!(scene.intersect(Point::new(0., 0., 0.), other, None).is_none());
    }
}
