//! Cybersjakk Core Library
//!
//! Plays an opening line, asks a UCI engine about every position along the
//! way and draws an SVG diagram per move.

pub mod analyzer;
pub mod config;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod line;
pub mod openings;

pub use analyzer::{run, run_with_stockfish, MoveReport, RunSummary};
pub use config::AnalysisConfig;
pub use engine::{Engine, EngineError, EngineSession, Evaluation, PositionAnalysis, StockfishEngine};
pub use error::{Error, Result};
pub use line::{AppliedMove, MoveLine};
pub use openings::OpeningLine;
