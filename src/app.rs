use crate::command::Command;
use crate::config::Config;
use crate::consts;
use crate::game::{Game, GameState};
use crate::screen::Screen;
use crate::store::FileStore;
use crate::theme::Theme;
use chrono::Local;
use crossterm::event::{poll, read, Event};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::Instant;

#[derive(Clone, Debug)]
pub(crate) struct App {
    game: Game<FileStore, Screen>,
    theme: Theme,
    config: Config,
    quitting: bool,
}

impl App {
    pub(crate) fn new(config: Config, store: FileStore) -> App {
        let theme = Theme::load(&store);
        log::info!("Using {theme}");
        let game = Game::new(config.game, store, Screen::default());
        App {
            game,
            theme,
            config,
            quitting: false,
        }
    }

    /// Run the game until the user quits, ticking it in real time
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        let mut last = Instant::now();
        while !self.quitting {
            self.draw(&mut terminal)?;
            let timeout = self
                .game
                .until_next_tick()
                .unwrap_or(consts::IDLE_POLL_PERIOD);
            if poll(timeout)? {
                self.handle_event(read()?);
            }
            let now = Instant::now();
            self.game.advance_time(now.saturating_duration_since(last));
            last = now;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let palette = self.config.palette(self.theme);
        let clock = Local::now().format("%H:%M").to_string();
        terminal.draw(|frame| {
            self.game
                .view()
                .draw(frame, self.theme, &palette, &clock);
        })?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Some(cmd) = event.as_key_press_event().and_then(Command::from_key_event) else {
            return;
        };
        if let Some(direction) = cmd.direction() {
            self.game.submit_direction(direction);
            return;
        }
        match cmd {
            Command::Quit | Command::Q | Command::Esc => {
                log::info!("Quitting");
                self.quitting = true;
            }
            Command::Enter | Command::R => {
                if self.game.state() == GameState::Over {
                    self.game.restart();
                }
            }
            Command::T => self.theme.toggle(self.game.persistence_mut()),
            Command::Up | Command::Down | Command::Left | Command::Right => (),
        }
    }
}
