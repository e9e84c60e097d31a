use super::grid::Grid;
use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// The cells are stored head-first; the snake is never empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    cells: VecDeque<Position>,
}

impl Snake {
    /// Create the starting snake: a horizontal segment of
    /// [`INITIAL_SNAKE_LENGTH`][consts::INITIAL_SNAKE_LENGTH] cells with its
    /// head in the center of `grid` and its tail trailing off to the left.
    pub(crate) fn centered(grid: Grid) -> Snake {
        let head = grid.center();
        let cells = (0..consts::INITIAL_SNAKE_LENGTH)
            .map_while(|i| head.x.checked_sub(i).map(|x| Position::new(x, head.y)))
            .collect();
        Snake { cells }
    }

    #[cfg(test)]
    pub(crate) fn from_cells<I: IntoIterator<Item = Position>>(cells: I) -> Snake {
        let cells = cells.into_iter().collect::<VecDeque<_>>();
        assert!(!cells.is_empty(), "a snake needs at least one cell");
        Snake { cells }
    }

    pub(crate) fn head(&self) -> Position {
        self.cells[0]
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Iterate over the snake's cells, head first
    pub(crate) fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    /// Make `pos` the new head
    pub(crate) fn push_head(&mut self, pos: Position) {
        self.cells.push_front(pos);
    }

    /// Drop the last cell of the tail, unless it is the only cell left
    pub(crate) fn pop_tail(&mut self) {
        if self.cells.len() > 1 {
            let _ = self.cells.pop_back();
        }
    }
}
