//! Run configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::openings::SICILIAN_NAJDORF;

pub const DEFAULT_ENGINE_PATH: &str = "./stockfish";
pub const DEFAULT_OUTPUT_DIR: &str = "cybersjakk_analyse";
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(500);

/// Everything a run needs, passed in explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// UCI engine executable
    pub engine_path: PathBuf,
    /// Where the diagrams are written
    pub output_dir: PathBuf,
    /// Search time per position
    pub time_limit: Duration,
    /// SAN moves played from the starting position
    pub moves: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine_path: PathBuf::from(DEFAULT_ENGINE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            time_limit: DEFAULT_TIME_LIMIT,
            moves: SICILIAN_NAJDORF.to_moves(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_engine_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.engine_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_moves<I, S>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moves = moves.into_iter().map(Into::into).collect();
        self
    }

    /// Fails with [`Error::EngineNotFound`](crate::Error::EngineNotFound)
    /// unless the engine path names an existing file
    pub fn check_engine(&self) -> crate::Result<&Path> {
        if self.engine_path.is_file() {
            Ok(self.engine_path.as_path())
        } else {
            Err(crate::Error::EngineNotFound(self.engine_path.clone()))
        }
    }
}
