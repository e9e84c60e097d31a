use crate::consts;
use crate::game::Grid;
use crate::store::{FileStore, LoadError};
use crate::theme::{Palette, Swatch, Theme};
use enum_map::EnumMap;
use ratatui::style::Color;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Board geometry & speed
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    /// Color overrides for each theme
    #[serde(default)]
    pub(crate) palette: PaletteConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Open the key-value store for high scores & preferences.
    ///
    /// If `self.files.persist` is `false`, an in-memory store is returned
    /// without reading anything from disk.
    pub(crate) fn open_store(&self) -> Result<FileStore, LoadError> {
        if !self.files.persist {
            return Ok(FileStore::in_memory());
        }
        let path = self
            .files
            .store_file
            .clone()
            .or_else(|| data_dir().map(|p| p.join("store.json")))
            .ok_or_else(LoadError::no_path)?;
        FileStore::open(path)
    }

    /// Return the path to write the log to, if any could be determined
    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.files
            .log_file
            .clone()
            .or_else(|| data_dir().map(|p| p.join("gridsnake.log")))
    }

    /// The colors to use for `theme`, with any configured overrides applied
    pub(crate) fn palette(&self, theme: Theme) -> Palette {
        let overrides = match theme {
            Theme::Light => &self.palette.light,
            Theme::Dark => &self.palette.dark,
        };
        theme.default_palette().patched(&overrides.0)
    }
}

fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("gridsnake"))
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGameConfig")]
pub(crate) struct GameConfig {
    pub(crate) grid: Grid,
    pub(crate) tick_period: Duration,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            grid: Grid::default(),
            tick_period: consts::TICK_PERIOD,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawGameConfig {
    canvas_size: u16,
    cell_size: u16,
    tick_period_ms: u64,
}

impl Default for RawGameConfig {
    fn default() -> RawGameConfig {
        RawGameConfig {
            canvas_size: consts::CANVAS_SIZE,
            cell_size: consts::CELL_SIZE,
            tick_period_ms: 100,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigValueError;

    fn try_from(value: RawGameConfig) -> Result<GameConfig, ConfigValueError> {
        let grid = Grid::from_canvas(value.canvas_size, value.cell_size).ok_or(
            ConfigValueError::Grid {
                canvas_size: value.canvas_size,
                cell_size: value.cell_size,
            },
        )?;
        if value.tick_period_ms == 0 {
            return Err(ConfigValueError::TickPeriod);
        }
        Ok(GameConfig {
            grid,
            tick_period: Duration::from_millis(value.tick_period_ms),
        })
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which high scores & preferences should be stored
    store_file: Option<PathBuf>,

    /// Path of the log file
    log_file: Option<PathBuf>,

    /// Whether to load & save high scores & preferences in a file
    persist: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            store_file: None,
            log_file: None,
            persist: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct PaletteConfig {
    #[serde(default)]
    light: PaletteOverrides,
    #[serde(default)]
    dark: PaletteOverrides,
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(try_from = "RawPaletteOverrides")]
struct PaletteOverrides(EnumMap<Swatch, Option<Color>>);

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct RawPaletteOverrides {
    canvas_bg: Option<String>,
    grid: Option<String>,
    snake_head: Option<String>,
    snake_body: Option<String>,
    food: Option<String>,
}

impl TryFrom<RawPaletteOverrides> for PaletteOverrides {
    type Error = ConfigValueError;

    fn try_from(value: RawPaletteOverrides) -> Result<PaletteOverrides, ConfigValueError> {
        let mut colors = EnumMap::default();
        for (swatch, raw) in [
            (Swatch::CanvasBg, value.canvas_bg),
            (Swatch::Grid, value.grid),
            (Swatch::SnakeHead, value.snake_head),
            (Swatch::SnakeBody, value.snake_body),
            (Swatch::Food, value.food),
        ] {
            if let Some(s) = raw {
                let color = s.parse::<Color>().map_err(|_| ConfigValueError::Color {
                    swatch: swatch.as_str(),
                    value: s.clone(),
                })?;
                colors[swatch] = Some(color);
            }
        }
        Ok(PaletteOverrides(colors))
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigValueError {
    #[error("canvas-size {canvas_size} with cell-size {cell_size} does not give a grid of at least {min} cells per side", min = consts::MIN_GRID_SIZE)]
    Grid { canvas_size: u16, cell_size: u16 },
    #[error("tick-period-ms must be greater than zero")]
    TickPeriod,
    #[error("invalid color {value:?} for {swatch}")]
    Color { swatch: &'static str, value: String },
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
