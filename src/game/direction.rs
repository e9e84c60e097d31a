use super::grid::Grid;
use enum_map::Enum;
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The unit step `(dx, dy)` for this direction; `y` grows downwards.
    pub(crate) fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Return the cell one step from `pos` in this direction, or `None` if
    /// that step would leave `grid`.
    pub(crate) fn advance(self, pos: Position, grid: Grid) -> Option<Position> {
        let (dx, dy) = self.delta();
        let pos = Position {
            x: pos.x.checked_add_signed(i16::from(dx))?,
            y: pos.y.checked_add_signed(i16::from(dy))?,
        };
        grid.contains(pos).then_some(pos)
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
