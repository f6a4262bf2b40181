use std::path::PathBuf;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::Parser;
use thiserror::Error;

use crate::game::INITIAL_SNAKE_LENGTH;
use crate::geometry::Arena;
use crate::score::DEFAULT_HIGH_SCORE_FILE;

pub const DEFAULT_WIDTH: u16 = 40;
pub const DEFAULT_HEIGHT: u16 = 20;
pub const DEFAULT_TICK_RATE: u32 = 10;
pub const DEFAULT_QUEUE_DEPTH: usize = 2;
pub const DEFAULT_LOG_FILE: &str = "snake.log";

/// Classic snake in the terminal. Arrow keys or WASD to steer, q to quit.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Arena width in cells, walls included.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_WIDTH)]
    pub width: u16,
    /// Arena height in cells, walls included.
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_HEIGHT)]
    pub height: u16,
    /// Snake moves per second.
    #[arg(
        long = "tick-rate",
        value_name = "TICKS_PER_SECOND",
        default_value_t = DEFAULT_TICK_RATE,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub tick_rate: u32,
    /// How many turns can be buffered between two moves.
    #[arg(
        long = "queue-depth",
        value_name = "TURNS",
        default_value_t = DEFAULT_QUEUE_DEPTH,
        value_parser = clap::value_parser!(u64).range(1..=8).map(|depth| depth as usize)
    )]
    pub queue_depth: usize,
    /// Where the high score is kept.
    #[arg(long = "high-score-file", value_name = "PATH", default_value = DEFAULT_HIGH_SCORE_FILE)]
    pub high_score_file: PathBuf,
    /// Where log output goes; the terminal itself is busy drawing the game.
    #[arg(long = "log-file", value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
    /// Seed for egg placement, for reproducible games.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("arena {width}x{height} is too small, it needs at least {min_width}x{min_height}")]
    ArenaTooSmall { width: u16, height: u16, min_width: u16, min_height: u16 },
    #[error("arena {width}x{height} does not fit a {columns}x{rows} terminal")]
    TerminalTooSmall { width: u16, height: u16, columns: u16, rows: u16 },
}

impl Default for Options {
    fn default() -> Self {
        Options {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate: DEFAULT_TICK_RATE,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            seed: None,
        }
    }
}

impl Options {
    // The starting snake lies along the middle row with its head on the
    // center column, and needs at least one free cell left for an egg.
    const MIN_WIDTH: u16 = 2 * INITIAL_SNAKE_LENGTH as u16 + 2;
    const MIN_HEIGHT: u16 = 3;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < Self::MIN_WIDTH || self.height < Self::MIN_HEIGHT {
            return Err(ConfigError::ArenaTooSmall {
                width: self.width,
                height: self.height,
                min_width: Self::MIN_WIDTH,
                min_height: Self::MIN_HEIGHT,
            });
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.width, self.height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_game() {
        let options = Options::parse_from(["eggsnake"]);
        assert_eq!(options.width, 40);
        assert_eq!(options.height, 20);
        assert_eq!(options.tick_interval(), Duration::from_millis(100));
        assert_eq!(options.queue_depth, 2);
        assert_eq!(options.high_score_file, PathBuf::from("data/.snake_highscore"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn parses_flags() {
        let options = Options::parse_from([
            "eggsnake",
            "--width",
            "30",
            "--height",
            "12",
            "--tick-rate",
            "20",
            "--queue-depth",
            "1",
            "--seed",
            "17",
        ]);
        assert_eq!(options.arena(), Arena::new(30, 12));
        assert_eq!(options.tick_interval(), Duration::from_millis(50));
        assert_eq!(options.queue_depth, 1);
        assert_eq!(options.seed, Some(17));
    }

    #[test]
    fn rejects_out_of_range_flags() {
        assert!(Options::try_parse_from(["eggsnake", "--tick-rate", "0"]).is_err());
        assert!(Options::try_parse_from(["eggsnake", "--queue-depth", "9"]).is_err());
    }

    #[test]
    fn tiny_arena_is_rejected() {
        let options = Options { width: 6, height: 20, ..Options::default() };
        assert!(matches!(options.validate(), Err(ConfigError::ArenaTooSmall { .. })));

        let options = Options { width: 40, height: 2, ..Options::default() };
        assert!(options.validate().is_err());

        let options = Options { width: 10, height: 3, ..Options::default() };
        assert!(options.validate().is_ok());
    }
}
