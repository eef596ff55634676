use crate::geom::plane::Plane;

use super::grid::Cell;
use super::ionosphere::Ionosphere;
use super::terrain::Terrain;

/// A patch of scene geometry.
#[derive(Debug, Clone)]
pub enum Geometry {
    Terrain(Terrain),
    Ionosphere(Ionosphere),
}

impl Geometry {
    pub fn plane(&self) -> &Plane {
        match self {
            Geometry::Terrain(t) => &t.plane,
            Geometry::Ionosphere(io) => &io.plane,
        }
    }

    pub fn cell(&self) -> Option<Cell> {
        match self {
            Geometry::Terrain(t) => t.cell,
            Geometry::Ionosphere(io) => io.cell,
        }
    }
}

impl From<Terrain> for Geometry {
    fn from(value: Terrain) -> Self {
        Geometry::Terrain(value)
    }
}

impl From<Ionosphere> for Geometry {
    fn from(value: Ionosphere) -> Self {
        Geometry::Ionosphere(value)
    }
}
