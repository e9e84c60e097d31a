use crate::render::{Glow, Surface};
use crate::util::blend;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};

/// Glyph whose foreground paints the top half of a character cell and whose
/// background paints the bottom half
const HALF_BLOCK: &str = "▀";

/// A [`Surface`] drawn into a region of a terminal buffer.
///
/// Each grid cell (`cell_size` × `cell_size` surface pixels) becomes one
/// "dot": a single column and half a row of the terminal, so that a character
/// cell holds two dots stacked vertically.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    cell_size: u16,
    background: Color,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(area: Rect, buf: &'a mut Buffer, cell_size: u16) -> Canvas<'a> {
        Canvas {
            area,
            buf,
            cell_size: cell_size.max(1),
            background: Color::Reset,
        }
    }

    /// Size in dots of a canvas showing a grid `grid_size` cells across, as
    /// (columns, rows)
    pub(crate) fn dimensions(grid_size: u16) -> (u16, u16) {
        (grid_size, grid_size.div_ceil(2))
    }

    /// Return the buffer coordinates of the character cell containing the
    /// dot `(dx, dy)` and whether the dot is its top half
    fn locate(&self, dx: u16, dy: u16) -> Option<((u16, u16), bool)> {
        if dx >= self.area.width || dy / 2 >= self.area.height {
            return None;
        }
        let x = self.area.x.checked_add(dx)?;
        let y = self.area.y.checked_add(dy / 2)?;
        Some(((x, y), dy % 2 == 0))
    }

    fn dot(&self, dx: u16, dy: u16) -> Option<Color> {
        let (xy, top) = self.locate(dx, dy)?;
        let cell = self.buf.cell(xy)?;
        Some(if top { cell.fg } else { cell.bg })
    }

    fn paint(&mut self, dx: u16, dy: u16, color: Color) {
        let Some((xy, top)) = self.locate(dx, dy) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut(xy) {
            cell.set_symbol(HALF_BLOCK);
            if top {
                cell.set_fg(color);
            } else {
                cell.set_bg(color);
            }
        }
    }

    /// The range of dots covered by `rect`, as inclusive (left, top, right,
    /// bottom) bounds
    fn dots(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        if rect.is_empty() {
            return None;
        }
        Some((
            rect.x / self.cell_size,
            rect.y / self.cell_size,
            (rect.right() - 1) / self.cell_size,
            (rect.bottom() - 1) / self.cell_size,
        ))
    }
}

impl Surface for Canvas<'_> {
    fn clear(&mut self, color: Color) {
        self.background = color;
        for pos in self.area.positions() {
            if let Some(cell) = self.buf.cell_mut(pos) {
                cell.set_symbol(HALF_BLOCK);
                cell.set_fg(color);
                cell.set_bg(color);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, glow: Option<Glow>) {
        let Some((left, top, right, bottom)) = self.dots(rect) else {
            return;
        };
        for dy in top..=bottom {
            for dx in left..=right {
                self.paint(dx, dy, color);
            }
        }
        let Some(glow) = glow else {
            return;
        };
        // Halos only spread over bare background, and only when the colors
        // can be mixed.
        let Some(halo) = blend(glow.color, self.background) else {
            return;
        };
        let radius = (glow.blur / self.cell_size).max(1);
        for dy in top.saturating_sub(radius)..=bottom.saturating_add(radius) {
            for dx in left.saturating_sub(radius)..=right.saturating_add(radius) {
                if self.dot(dx, dy) == Some(self.background) {
                    self.paint(dx, dy, halo);
                }
            }
        }
    }

    // Grid hairlines are narrower than a dot, so they are not drawn.
    fn stroke_line(&mut self, _from: Position, _to: Position, _color: Color) {}
}
