//! Game outcome classification.

use crate::types::Color;
use serde::{Deserialize, Serialize};

/// State of the game as derived from the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Side to move still has moves and no draw rule applies.
    InProgress,
    /// Checkmate delivered by the given color.
    Win(Color),
    /// Drawn by insufficient material, the fifty-move rule or repetition.
    Draw,
    /// Side to move has no legal move and is not in check.
    Stalemate,
}

impl GameOutcome {
    /// Returns true once no further moves may be played.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOutcome::Win(color) => Some(*color),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Win(Color::White) => write!(f, "White wins by checkmate"),
            GameOutcome::Win(Color::Black) => write!(f, "Black wins by checkmate"),
            GameOutcome::Draw => write!(f, "Draw"),
            GameOutcome::Stalemate => write!(f, "Stalemate"),
        }
    }
}
