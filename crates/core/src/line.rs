//! Playing a fixed list of SAN moves from the starting position

use shakmaty::san::{San, SanError};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position, fen::Fen};

use crate::error::{Error, Result};

/// A move that has been played on the board
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    /// 1-based position in the move list
    pub index: usize,
    /// The move as it was given
    pub san: String,
    /// Square-to-square form of the same move
    pub uci: UciMove,
}

/// Board state that advances one SAN move at a time
pub struct MoveLine {
    position: Chess,
    played: usize,
}

impl MoveLine {
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            played: 0,
        }
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Number of moves applied so far
    pub fn played(&self) -> usize {
        self.played
    }

    pub fn current_fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// Plays the next move. Ambiguous or illegal moves leave the position
    /// untouched.
    pub fn apply_san(&mut self, san_text: &str) -> Result<AppliedMove> {
        let index = self.played + 1;

        let san: San = san_text.trim().parse().map_err(|e| Error::InvalidSan {
            san: san_text.to_string(),
            reason: format!("{}", e),
        })?;

        let mv = san.to_move(&self.position).map_err(|e| Error::IllegalMove {
            index,
            san: san_text.to_string(),
            reason: describe(e),
        })?;

        let uci = mv.to_uci(CastlingMode::Standard);
        self.position = self
            .position
            .clone()
            .play(mv)
            .map_err(|e| Error::IllegalMove {
                index,
                san: san_text.to_string(),
                reason: e.to_string(),
            })?;
        self.played = index;

        Ok(AppliedMove {
            index,
            san: san_text.to_string(),
            uci,
        })
    }
}

impl Default for MoveLine {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(error: SanError) -> String {
    match error {
        SanError::AmbiguousSan => "ambiguous in this position".to_string(),
        _ => "illegal in this position".to_string(),
    }
}
