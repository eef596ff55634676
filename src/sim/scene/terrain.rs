use crate::geom::plane::Plane;

use super::grid::Cell;

/// Solid ground patch. Rays hitting terrain from above are absorbed.
#[derive(Debug, Clone)]
pub struct Terrain {
    pub plane: Plane,
    /// Grid cell the patch covers, if it is part of a gridded shell
    pub cell: Option<Cell>,
}

impl Terrain {
    pub fn new(plane: Plane) -> Self {
        Self { plane, cell: None }
    }

    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cell = Some(cell);
        self
    }
}
