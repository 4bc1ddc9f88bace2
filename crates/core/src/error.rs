//! Error types for cybersjakk-core

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Engine not found at path: {}", .0.display())]
    EngineNotFound(PathBuf),

    #[error("Invalid SAN '{san}': {reason}")]
    InvalidSan { san: String, reason: String },

    #[error("Move {index} ({san}) cannot be played: {reason}")]
    IllegalMove {
        index: usize,
        san: String,
        reason: String,
    },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Diagram rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
