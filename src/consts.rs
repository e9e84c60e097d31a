//! Assorted constants & hard-coded configuration
use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

/// Default time between movements of the snake
pub(crate) const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Default width & height of the drawing surface, in pixels
pub(crate) const CANVAS_SIZE: u16 = 300;

/// Default width & height of a single grid cell, in pixels
pub(crate) const CELL_SIZE: u16 = 10;

/// The smallest grid that can hold the initial snake to the left of center
pub(crate) const MIN_GRID_SIZE: u16 = 4;

/// Length of the snake at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: u16 = 3;

/// Points awarded for eating a piece of food
pub(crate) const FOOD_REWARD: u32 = 10;

/// Persistence key under which the high score is stored
pub(crate) const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Persistence key under which the theme preference is stored
pub(crate) const THEME_KEY: &str = "theme";

/// Blur radius, in pixels, of the glow around snake cells in dark mode
pub(crate) const SNAKE_GLOW_BLUR: u16 = 10;

/// Blur radius, in pixels, of the glow around the food in dark mode
pub(crate) const FOOD_GLOW_BLUR: u16 = 15;

/// How long to wait for input when no tick is scheduled.  The clock in the
/// score bar only needs refreshing about this often.
pub(crate) const IDLE_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the title of the game-over pop-up
pub(crate) const GAME_OVER_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::BOLD);
