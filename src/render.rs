//! Drawing a game frame onto an abstract surface
use crate::consts;
use crate::theme::{Palette, Swatch};
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;

/// A drawing surface measured in pixels, with the origin in the top-left
/// corner
pub(crate) trait Surface {
    /// Paint the entire surface with `color`
    fn clear(&mut self, color: Color);

    /// Paint the pixels of `rect` with `color`, optionally surrounded by a
    /// glow
    fn fill_rect(&mut self, rect: Rect, color: Color, glow: Option<Glow>);

    /// Draw a one-pixel line between two points
    fn stroke_line(&mut self, from: Position, to: Position, color: Color);
}

/// A soft halo drawn around a filled shape
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Glow {
    pub(crate) color: Color,
    /// Blur radius in pixels
    pub(crate) blur: u16,
}

/// Everything needed to draw the board at one moment of the game
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FrameState {
    /// Number of cells along each side of the grid
    pub(crate) grid_size: u16,

    /// Width & height of a cell in pixels
    pub(crate) cell_size: u16,

    /// The snake's cells, head first
    pub(crate) snake: Vec<Position>,

    pub(crate) food: Option<Position>,
}

impl FrameState {
    /// Width & height of the whole board in pixels
    pub(crate) fn extent(&self) -> u16 {
        self.grid_size.saturating_mul(self.cell_size)
    }

    /// The pixel rectangle covered by the grid cell at `pos`
    pub(crate) fn cell_rect(&self, pos: Position) -> Rect {
        Rect::new(
            pos.x.saturating_mul(self.cell_size),
            pos.y.saturating_mul(self.cell_size),
            self.cell_size,
            self.cell_size,
        )
    }
}

/// Draw `frame` onto `surface`: background, grid lines, food, then the
/// snake from head to tail.  If `glow` is true, the food & snake are drawn
/// with a glow effect.
pub(crate) fn draw_frame<S: Surface>(
    surface: &mut S,
    frame: &FrameState,
    palette: &Palette,
    glow: bool,
) {
    surface.clear(palette.get(Swatch::CanvasBg));

    let extent = frame.extent();
    let grid_color = palette.get(Swatch::Grid);
    for i in 0..=frame.grid_size {
        let pos = i.saturating_mul(frame.cell_size);
        surface.stroke_line(Position::new(pos, 0), Position::new(pos, extent), grid_color);
        surface.stroke_line(Position::new(0, pos), Position::new(extent, pos), grid_color);
    }

    if let Some(food) = frame.food {
        let color = palette.get(Swatch::Food);
        let halo = glow.then_some(Glow {
            color,
            blur: consts::FOOD_GLOW_BLUR,
        });
        surface.fill_rect(frame.cell_rect(food), color, halo);
    }

    let head_color = palette.get(Swatch::SnakeHead);
    let body_color = palette.get(Swatch::SnakeBody);
    let halo = glow.then_some(Glow {
        color: head_color,
        blur: consts::SNAKE_GLOW_BLUR,
    });
    for (i, &cell) in frame.snake.iter().enumerate() {
        let color = if i == 0 { head_color } else { body_color };
        surface.fill_rect(frame.cell_rect(cell), color, halo);
    }
}
