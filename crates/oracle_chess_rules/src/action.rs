//! First-class move types.
//!
//! Moves are intents, not side effects. A `Move` says nothing about whether it
//! is legal; only a position can answer that, through the store's legality gate.

use crate::types::{PromotionKind, Square};
use derive_more::{Display, Error};
use std::str::FromStr;
use tracing::instrument;

/// A move in coordinate notation: origin, destination and optional promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    origin: Square,
    destination: Square,
    promotion: Option<PromotionKind>,
}

impl Move {
    /// Creates a move without a promotion piece.
    pub fn new(origin: Square, destination: Square) -> Self {
        Self {
            origin,
            destination,
            promotion: None,
        }
    }

    /// Creates a move that promotes to `promotion`.
    pub fn with_promotion(origin: Square, destination: Square, promotion: PromotionKind) -> Self {
        Self {
            origin,
            destination,
            promotion: Some(promotion),
        }
    }

    /// Square the piece leaves.
    pub fn origin(&self) -> Square {
        self.origin
    }

    /// Square the piece lands on.
    pub fn destination(&self) -> Square {
        self.destination
    }

    /// Promotion piece, if any.
    pub fn promotion(&self) -> Option<PromotionKind> {
        self.promotion
    }

    /// Four-character origin/destination pair, e.g. `"e2e4"`.
    ///
    /// Promotion is not part of the pair.
    pub fn to_coordinate_pair(&self) -> String {
        format!("{}{}", self.origin, self.destination)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion)?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = NotationError;

    /// Parses 4 or 5 characters: origin, destination, optional promotion code.
    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(NotationError::new(format!(
                "Move must be 4 or 5 ASCII characters: {:?}",
                s
            )));
        }

        let origin: Square = s[0..2].parse()?;
        let destination: Square = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(code) => Some(PromotionKind::from_code(code).ok_or_else(|| {
                NotationError::new(format!("Unknown promotion code {:?} in {:?}", code, s))
            })?),
        };

        Ok(Self {
            origin,
            destination,
            promotion,
        })
    }
}

/// Error raised by the legality gate.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The move is not among the legal moves of the current position.
    #[display("Illegal move: {}", _0)]
    IllegalMove(Move),

    /// The game has already reached a terminal outcome.
    #[display("Game is already over")]
    GameOver,

    /// A store invariant failed after applying a move.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// Coordinate notation could not be parsed.
#[derive(Debug, Clone, Display, Error)]
#[display("Notation error: {} at {}:{}", message, file, line)]
pub struct NotationError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl NotationError {
    /// Creates a new notation error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
