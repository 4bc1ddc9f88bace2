//! Chess engine integration
//!
//! Provides the interface to UCI-compatible engines like Stockfish and the
//! scoped session that owns one engine for the length of a run.

use std::time::Duration;

use shakmaty::Chess;
use thiserror::Error;

pub mod analysis;
pub mod session;
pub mod stockfish;

// Re-export main types for convenience
pub use analysis::{Evaluation, PositionAnalysis};
pub use session::EngineSession;
pub use stockfish::StockfishEngine;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to start the engine process
    #[error("Failed to start engine: {0}")]
    Spawn(String),
    /// Failed to communicate with engine
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Engine returned unexpected response
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// Engine closed its output before answering
    #[error("Engine closed unexpectedly")]
    Closed,
    /// Session was already closed
    #[error("Engine session is closed")]
    NotRunning,
}

/// Something that can evaluate chess positions.
///
/// The run only needs these two operations, so tests drive it with a
/// scripted engine instead of a real process.
pub trait Engine {
    /// Searches `position` for at most `limit` and reports the result with
    /// the score oriented to White.
    fn analyse(&mut self, position: &Chess, limit: Duration) -> Result<PositionAnalysis, EngineError>;

    /// Shuts the engine down. Calling it more than once is a no-op.
    fn quit(&mut self) -> Result<(), EngineError>;
}
