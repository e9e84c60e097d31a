use ratatui::layout::{Flex, Layout, Rect, Size};
use ratatui::style::Color;

/// Return a rectangle of the given size centered within `area`, shrunk as
/// needed to fit
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

/// Mix two RGB colors half and half.  Returns `None` unless both colors are
/// [`Color::Rgb`].
pub(crate) fn blend(a: Color, b: Color) -> Option<Color> {
    match (a, b) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            Some(Color::Rgb(mean(r1, r2), mean(g1, g2), mean(b1, b2)))
        }
        _ => None,
    }
}

fn mean(a: u8, b: u8) -> u8 {
    a / 2 + b / 2 + (a & b & 1)
}
