use super::{BitMatrix, Point};

/// Module bitmap sampled from one detected grid, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCode {
    /// Image-space corners: top-left, top-right, bottom-right, bottom-left
    pub corners: [Point; 4],
    /// Modules per side
    pub size: usize,
    /// Sampled modules, `cells.get(x, y)` with x the column
    pub cells: BitMatrix,
}

impl RawCode {
    /// Raw code from an already-sampled module grid
    pub fn from_cells(cells: BitMatrix, corners: [Point; 4]) -> Self {
        Self {
            corners,
            size: cells.width(),
            cells,
        }
    }

    /// Module at row `y`, column `x`
    pub fn module(&self, x: usize, y: usize) -> bool {
        self.cells.get(x, y)
    }
}
