mod config;
mod egg;
mod events;
mod game;
mod geometry;
mod score;
mod snake;
mod term;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use log::{info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};
use simplelog::{Config, WriteLogger};
use thiserror::Error;

use crate::config::{ConfigError, Options};
use crate::game::Game;
use crate::score::FileScoreStore;
use crate::term::TermManager;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not open log file {path}: {source}")]
    LogFile { path: PathBuf, source: io::Error },
    #[error("could not start logging: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

fn main() {
    let options = Options::parse();

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn run(options: Options) -> Result<(), AppError> {
    // The terminal belongs to the game, so logs go to a file.
    init_logging(&options.log_file)?;
    info!("Starting snake with {:?}", options);

    options.validate()?;
    TermManager::check_fits(options.width, options.height)?;

    let store = FileScoreStore::new(&options.high_score_file);
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(options.arena(), options.queue_depth, store, rng);

    let runtime = tokio::runtime::Runtime::new()?;
    let mut term = TermManager::new();
    term.setup()?;

    let result = runtime.block_on(events::run(&mut game, &mut term, options.tick_interval()));
    term.restore()?;
    result?;

    info!(
        "Exiting, last score {} with length {} (high score {})",
        game.score(),
        game.snake().len(),
        game.high_score()
    );
    Ok(())
}

fn init_logging(path: &Path) -> Result<(), AppError> {
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    let file = File::create(path).map_err(|source| AppError::LogFile { path: path.to_path_buf(), source })?;

    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}
