use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use thiserror::Error;

pub const DEFAULT_HIGH_SCORE_FILE: &str = "data/.snake_highscore";

/// Somewhere to keep the best score between runs. Failures stay inside the
/// store: `load` falls back to 0 and `save` only logs.
pub trait ScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, score: u32);
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("could not access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("{path} does not hold a score: {source}")]
    Parse { path: PathBuf, source: ParseIntError },
}

/// Keeps the high score as a plain decimal number in a text file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileScoreStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<u32>, ScoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ScoreError::Io { path: self.path.clone(), source }),
        };

        text.trim()
            .parse()
            .map(Some)
            .map_err(|source| ScoreError::Parse { path: self.path.clone(), source })
    }

    fn write(&self, score: u32) -> Result<(), ScoreError> {
        let io_err = |source| ScoreError::Io { path: self.path.clone(), source };

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ScoreError::Io { path: dir.to_path_buf(), source })?;
        }

        fs::write(&self.path, score.to_string()).map_err(io_err)
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        FileScoreStore::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> u32 {
        match self.read() {
            Ok(Some(score)) => {
                info!("Loaded high score {} from {}", score, self.path.display());
                score
            }
            Ok(None) => {
                info!("High score file not found at {}, starting with 0", self.path.display());
                0
            }
            Err(e) => {
                warn!("Error loading high score: {}", e);
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        match self.write(score) {
            Ok(()) => info!("Saved high score {} to {}", score, self.path.display()),
            Err(e) => error!("Error saving high score: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("eggsnake-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_loads_zero() {
        let dir = scratch_dir("missing");
        let store = FileScoreStore::new(dir.join("nothing-here"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn garbage_loads_zero() {
        let dir = scratch_dir("garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("score");
        fs::write(&path, "not a number").unwrap();

        let store = FileScoreStore::new(&path);
        assert_eq!(store.load(), 0);
        assert!(matches!(store.read(), Err(ScoreError::Parse { .. })));

        fs::write(&path, "-40").unwrap();
        assert_eq!(store.load(), 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_creates_directories_and_loads_back() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join(".snake_highscore");

        let mut store = FileScoreStore::new(&path);
        store.save(130);
        assert_eq!(fs::read_to_string(&path).unwrap(), "130");
        assert_eq!(store.load(), 130);

        // Surrounding whitespace from hand edits is fine.
        fs::write(&path, " 70\n").unwrap();
        assert_eq!(store.load(), 70);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_save_is_not_fatal() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        // A regular file where a directory should be.
        let blocker = dir.join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut store = FileScoreStore::new(blocker.join("score"));
        store.save(50);
        assert_eq!(store.load(), 0);

        let _ = fs::remove_dir_all(&dir);
    }
}
