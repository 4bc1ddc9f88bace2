//! Built-in opening line

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningLine {
    pub eco: &'static str,
    pub name: &'static str,
    pub moves: &'static [&'static str],
}

impl OpeningLine {
    /// Owned copy of the moves, ready to hand to a run
    pub fn to_moves(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.to_string()).collect()
    }
}

/// Sicilian Defence, Najdorf Variation. Sharp and tactical.
pub const SICILIAN_NAJDORF: OpeningLine = OpeningLine {
    eco: "B90",
    name: "Sicilian Defence: Najdorf Variation",
    moves: &["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"],
};
