use crate::game::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    R,
    T,
    Q,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (_, KeyCode::Up) => Some(Command::Up),
            (_, KeyCode::Down) => Some(Command::Down),
            (_, KeyCode::Left) => Some(Command::Left),
            (_, KeyCode::Right) => Some(Command::Right),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('w' | 'W')) => {
                Some(Command::Up)
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('s' | 'S')) => {
                Some(Command::Down)
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('a' | 'A')) => {
                Some(Command::Left)
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('d' | 'D')) => {
                Some(Command::Right)
            }
            (_, KeyCode::Enter) => Some(Command::Enter),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Command::R),
            (KeyModifiers::NONE, KeyCode::Char('t')) => Some(Command::T),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Command::Q),
            _ => None,
        }
    }

    /// The direction of travel requested by a movement command
    pub(crate) fn direction(self) -> Option<Direction> {
        match self {
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            _ => None,
        }
    }
}
