mod app;
mod command;
mod config;
mod consts;
mod game;
mod render;
mod screen;
mod store;
mod theme;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::store::FileStore;
use anyhow::Context;
use simplelog::{LevelFilter, WriteLogger};
use std::io::ErrorKind;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e.downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gridsnake: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config_path = Config::default_path()?;
    let config = Config::load(&config_path, true).with_context(|| {
        format!(
            "failed to load configuration from {}",
            config_path.display()
        )
    })?;
    if let Err(e) = init_logging(&config) {
        eprintln!("gridsnake: logging disabled: {e:#}");
    }
    log::info!("Starting gridsnake {}", env!("CARGO_PKG_VERSION"));
    let store = match config.open_store() {
        Ok(store) => {
            match store.path() {
                Some(p) => log::info!("Using store file {}", p.display()),
                None => log::info!("Not persisting high scores & preferences"),
            }
            store
        }
        Err(e) => {
            log::warn!(
                "{:#}; high scores & preferences will not be saved",
                anyhow::Error::new(e)
            );
            FileStore::in_memory()
        }
    };
    let terminal = ratatui::init();
    let r = App::new(config, store).run(terminal);
    ratatui::restore();
    log::info!("Exiting");
    Ok(r?)
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let Some(path) = config.log_file() else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::File::create(&path)?;
    WriteLogger::init(LevelFilter::Info, simplelog::Config::default(), file)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
