//! The terminal rendition of the game's display outputs
mod canvas;
use self::canvas::Canvas;
use crate::consts;
use crate::game::{GameState, View};
use crate::render::{draw_frame, FrameState};
use crate::theme::{Palette, Theme};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect, Size},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
    Frame,
};

/// Width & height of the game-over pop-up, borders included
const GAME_OVER_SIZE: Size = Size::new(26, 6);

/// A [`View`] that remembers the latest outputs of the game so that they can
/// be drawn to the terminal on demand
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Screen {
    frame: Option<FrameState>,
    score: u32,
    high_score: u32,
    status: Option<GameState>,
    game_over: Option<u32>,
}

impl Screen {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>, theme: Theme, palette: &Palette, clock: &str) {
        let scene = Scene {
            screen: self,
            theme,
            palette,
            clock,
        };
        frame.render_widget(scene, frame.area());
    }
}

impl View for Screen {
    fn render(&mut self, frame: FrameState) {
        self.frame = Some(frame);
    }

    fn update_scores(&mut self, score: u32, high_score: u32) {
        self.score = score;
        self.high_score = high_score;
    }

    fn set_status(&mut self, state: GameState) {
        self.status = Some(state);
    }

    fn show_game_over(&mut self, final_score: u32) {
        self.game_over = Some(final_score);
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }
}

/// A [`Screen`] as it should appear at a given moment
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scene<'a> {
    screen: &'a Screen,
    theme: Theme,
    palette: &'a Palette,
    /// Wall-clock time shown in the score bar
    clock: &'a str,
}

impl Scene<'_> {
    fn render_score_bar(&self, area: Rect, buf: &mut Buffer) {
        let Screen {
            score, high_score, ..
        } = *self.screen;
        Line::styled(
            format!(" Score: {score}  High Score: {high_score}"),
            consts::SCORE_BAR_STYLE,
        )
        .render(area, buf);
        Line::styled(
            format!("{}  {} ", self.theme, self.clock),
            consts::SCORE_BAR_STYLE,
        )
        .alignment(Alignment::Right)
        .render(area, buf);
    }

    fn render_board(&self, area: Rect, buf: &mut Buffer) {
        let Some(ref frame) = self.screen.frame else {
            return;
        };
        let (width, height) = Canvas::dimensions(frame.grid_size);
        let block_area = center_rect(
            area,
            Size::new(width.saturating_add(2), height.saturating_add(2)),
        );
        Block::bordered().render(block_area, buf);
        let mut canvas = Canvas::new(block_area.inner(Margin::new(1, 1)), buf, frame.cell_size);
        draw_frame(&mut canvas, frame, self.palette, self.theme.glow());
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        if self.screen.status == Some(GameState::Over) {
            spans.extend([
                Span::raw("Restart: "),
                Span::styled("Enter", consts::KEY_STYLE),
                Span::raw("  "),
            ]);
        }
        spans.extend([
            Span::raw("Move: "),
            Span::styled("←↑↓→/WASD", consts::KEY_STYLE),
            Span::raw("  Theme: "),
            Span::styled("t", consts::KEY_STYLE),
            Span::raw("  Quit: "),
            Span::styled("q", consts::KEY_STYLE),
        ]);
        Line::from(spans).render(area, buf);
    }

    fn render_game_over(final_score: u32, area: Rect, buf: &mut Buffer) {
        let popup = center_rect(area, GAME_OVER_SIZE);
        Clear.render(popup, buf);
        let block = Block::bordered()
            .title(" GAME OVER ")
            .title_alignment(Alignment::Center)
            .title_style(consts::GAME_OVER_STYLE);
        Paragraph::new(vec![
            Line::default(),
            Line::from(format!("Final score: {final_score}")),
            Line::default(),
            Line::from(vec![
                Span::raw("Restart ("),
                Span::styled("Enter", consts::KEY_STYLE),
                Span::raw(")"),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(block)
        .render(popup, buf);
    }
}

impl Widget for Scene<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [bar_area, board_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        self.render_score_bar(bar_area, buf);
        self.render_board(board_area, buf);
        if let Some(status) = self.screen.status {
            Line::from(format!(" {status}")).render(status_area, buf);
        }
        self.render_help(help_area, buf);
        if let Some(final_score) = self.screen.game_over {
            Scene::render_game_over(final_score, area, buf);
        }
    }
}
