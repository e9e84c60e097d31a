use crate::consts;
use ratatui::layout::Position;
#[cfg(test)]
use ratatui::layout::{Positions, Rect, Size};

/// The square playing field: `size` cells along each side, each cell
/// `cell_size` pixels wide and tall when drawn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    size: u16,
    cell_size: u16,
}

impl Grid {
    /// Construct the grid that fits in a square canvas `canvas_size` pixels
    /// wide.  Returns `None` if `cell_size` is zero or if the resulting grid
    /// would be too small for the initial snake.
    pub(crate) fn from_canvas(canvas_size: u16, cell_size: u16) -> Option<Grid> {
        let size = canvas_size.checked_div(cell_size)?;
        (size >= consts::MIN_GRID_SIZE).then_some(Grid { size, cell_size })
    }

    /// Number of cells along each side
    pub(crate) fn size(self) -> u16 {
        self.size
    }

    pub(crate) fn cell_size(self) -> u16 {
        self.cell_size
    }

    /// Total number of cells
    pub(crate) fn area(self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    pub(crate) fn contains(self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    /// The cell in the middle of the grid (rounding down)
    pub(crate) fn center(self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    /// Iterate over every cell in the grid, row by row
    #[cfg(test)]
    pub(crate) fn positions(self) -> Positions {
        Rect::from((
            Position::ORIGIN,
            Size {
                width: self.size,
                height: self.size,
            },
        ))
        .positions()
    }
}

impl Default for Grid {
    fn default() -> Grid {
        Grid {
            size: consts::CANVAS_SIZE / consts::CELL_SIZE,
            cell_size: consts::CELL_SIZE,
        }
    }
}
