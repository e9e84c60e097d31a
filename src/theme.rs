//! Light & dark color schemes
use crate::consts;
use crate::store::Persistence;
use enum_map::{enum_map, Enum, EnumMap};
use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The string under which the theme is persisted
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light-mode",
            Theme::Dark => "dark-mode",
        }
    }

    pub(crate) fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Whether cells should be drawn with a glow effect
    pub(crate) fn glow(self) -> bool {
        self == Theme::Dark
    }

    /// Read the saved theme preference.  A missing or unrecognized value
    /// yields the default theme.
    pub(crate) fn load<P: Persistence>(store: &P) -> Theme {
        match store.get(consts::THEME_KEY).map(str::parse::<Theme>) {
            Some(Ok(theme)) => theme,
            Some(Err(e)) => {
                log::warn!("{e}; using {}", Theme::default());
                Theme::default()
            }
            None => Theme::default(),
        }
    }

    /// Switch to the other theme and persist the choice.  Failure to
    /// persist is logged and otherwise ignored.
    pub(crate) fn toggle<P: Persistence>(&mut self, store: &mut P) {
        *self = self.toggled();
        log::info!("Switched to {self}");
        if let Err(e) = store.set(consts::THEME_KEY, self.as_str()) {
            log::warn!("Could not save theme preference: {:#}", anyhow::Error::new(e));
        }
    }

    /// The built-in colors for this theme
    pub(crate) fn default_palette(self) -> Palette {
        match self {
            Theme::Light => Palette(enum_map! {
                Swatch::CanvasBg => Color::Rgb(0xc7, 0xf0, 0xd8),
                Swatch::Grid => Color::Rgb(0xb0, 0xd8, 0xbe),
                Swatch::SnakeHead => Color::Rgb(0x2b, 0x3a, 0x25),
                Swatch::SnakeBody => Color::Rgb(0x43, 0x52, 0x3d),
                Swatch::Food => Color::Rgb(0x8b, 0x00, 0x00),
            }),
            Theme::Dark => Palette(enum_map! {
                Swatch::CanvasBg => Color::Rgb(0x0f, 0x1a, 0x0f),
                Swatch::Grid => Color::Rgb(0x1c, 0x2b, 0x1c),
                Swatch::SnakeHead => Color::Rgb(0x39, 0xff, 0x14),
                Swatch::SnakeBody => Color::Rgb(0x2e, 0xcc, 0x40),
                Swatch::Food => Color::Rgb(0xff, 0x41, 0x36),
            }),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Theme, ParseThemeError> {
        match s {
            "light-mode" => Ok(Theme::Light),
            "dark-mode" => Ok(Theme::Dark),
            _ => Err(ParseThemeError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown theme {0:?}")]
pub(crate) struct ParseThemeError(String);

/// The named colors used when drawing the board
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum Swatch {
    CanvasBg,
    Grid,
    SnakeHead,
    SnakeBody,
    Food,
}

impl Swatch {
    /// The name of the color in the configuration file
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Swatch::CanvasBg => "canvas-bg",
            Swatch::Grid => "grid",
            Swatch::SnakeHead => "snake-head",
            Swatch::SnakeBody => "snake-body",
            Swatch::Food => "food",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Palette(EnumMap<Swatch, Color>);

impl Palette {
    pub(crate) fn get(&self, swatch: Swatch) -> Color {
        self.0[swatch]
    }

    /// Replace the colors for which `overrides` has a value
    pub(crate) fn patched(mut self, overrides: &EnumMap<Swatch, Option<Color>>) -> Palette {
        for (swatch, color) in overrides {
            if let Some(c) = *color {
                self.0[swatch] = c;
            }
        }
        self
    }
}
