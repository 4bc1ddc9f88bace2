//! Types for representing engine analysis results

use std::fmt;

use shakmaty::uci::UciMove;
use shakmaty::Color;

/// Represents a position evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Centipawn score (positive = white advantage)
    Centipawns(i32),
    /// Forced mate (positive = white mates, negative = black mates)
    Mate(i32),
    /// The given side has been checkmated
    Checkmated(Color),
}

impl Evaluation {
    /// Builds an evaluation from the `score cp` / `score mate` fields of a UCI
    /// info line. A mate score wins over a centipawn score.
    pub fn from_uci_score(cp: Option<i32>, mate: Option<i32>) -> Option<Self> {
        match (cp, mate) {
            (_, Some(m)) => Some(Evaluation::Mate(m)),
            (Some(c), None) => Some(Evaluation::Centipawns(c)),
            (None, None) => None,
        }
    }

    /// Re-orients a side-to-move relative score so it reads from White's
    /// point of view. `mate 0` means the side to move is already mated, which
    /// has no sign to flip, so it becomes [`Evaluation::Checkmated`].
    pub fn for_white(self, side_to_move: Color) -> Self {
        match (self, side_to_move) {
            (Evaluation::Mate(0), side) => Evaluation::Checkmated(side),
            (eval, Color::White) => eval,
            (eval, Color::Black) => eval.negate(),
        }
    }

    fn negate(self) -> Self {
        match self {
            Evaluation::Centipawns(cp) => Evaluation::Centipawns(-cp),
            Evaluation::Mate(moves) => Evaluation::Mate(-moves),
            Evaluation::Checkmated(side) => Evaluation::Checkmated(side),
        }
    }

    /// Returns true if the position is winning for white
    pub fn is_white_winning(&self) -> bool {
        match self {
            Evaluation::Centipawns(cp) => *cp > 100,
            Evaluation::Mate(moves) => *moves > 0,
            Evaluation::Checkmated(side) => *side == Color::Black,
        }
    }

    /// Returns true if the position is winning for black
    pub fn is_black_winning(&self) -> bool {
        match self {
            Evaluation::Centipawns(cp) => *cp < -100,
            Evaluation::Mate(moves) => *moves < 0,
            Evaluation::Checkmated(side) => *side == Color::White,
        }
    }

    /// Short plain-language reading of the score
    pub fn verdict(&self) -> &'static str {
        if self.is_white_winning() {
            "White is better"
        } else if self.is_black_winning() {
            "Black is better"
        } else {
            "roughly equal"
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => {
                let score = *cp as f32 / 100.0;
                if score >= 0.0 {
                    write!(f, "+{:.2}", score)
                } else {
                    write!(f, "{:.2}", score)
                }
            }
            Evaluation::Mate(moves) if *moves >= 0 => write!(f, "#+{}", moves),
            Evaluation::Mate(moves) => write!(f, "#{}", moves),
            Evaluation::Checkmated(Color::White) => write!(f, "#-0"),
            Evaluation::Checkmated(Color::Black) => write!(f, "#+0"),
        }
    }
}

/// Complete analysis of a position
#[derive(Debug, Clone, PartialEq)]
pub struct PositionAnalysis {
    /// Evaluation of the position, always from White's point of view
    pub evaluation: Evaluation,
    /// Principal variation (best line of play)
    pub pv: Vec<UciMove>,
    /// Analysis depth reached
    pub depth: u32,
    /// Nodes searched
    pub nodes: u64,
    /// Time spent analyzing (milliseconds)
    pub time_ms: u64,
}

impl PositionAnalysis {
    /// Creates an analysis with just an evaluation and a line
    pub fn new(evaluation: Evaluation, pv: Vec<UciMove>) -> Self {
        Self {
            evaluation,
            pv,
            depth: 0,
            nodes: 0,
            time_ms: 0,
        }
    }

    /// The engine's suggested reply, if it reported a line at all
    pub fn best_reply(&self) -> Option<&UciMove> {
        self.pv.first()
    }

    /// Returns a brief summary of the analysis
    pub fn summary(&self) -> String {
        let best = self
            .best_reply()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "Eval: {} | Best: {} | Depth: {} | PV: {}",
            self.evaluation,
            best,
            self.depth,
            self.pv
                .iter()
                .take(5)
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}
