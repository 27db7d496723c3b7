//! Core value types: squares, colors and promotion pieces.

use crate::action::NotationError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
const RANKS: [char; 8] = ['1', '2', '3', '4', '5', '6', '7', '8'];

/// One of the 64 board coordinates.
///
/// Indexed rank-major from `a1` (0) to `h8` (63), so `b1` is 1 and `a2` is 8.
/// Defaults to `a1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub(crate) u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a square from zero-based file and rank (both `0..8`).
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self(rank * 8 + file))
        } else {
            None
        }
    }

    /// Creates a square from its board index (`0..64`).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self(index as u8))
    }

    /// Board index of this square.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based file (`a` = 0).
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    /// Zero-based rank (`1` = 0).
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Iterates all 64 squares from `a1` to `h8`.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            FILES[self.file() as usize],
            RANKS[self.rank() as usize]
        )
    }
}

impl FromStr for Square {
    type Err = NotationError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(NotationError::new(format!("Square must be two characters: {:?}", s)));
        };

        let file = FILES
            .iter()
            .position(|c| *c == file)
            .ok_or_else(|| NotationError::new(format!("Unknown file {:?} in {:?}", file, s)))?;
        let rank = RANKS
            .iter()
            .position(|c| *c == rank)
            .ok_or_else(|| NotationError::new(format!("Unknown rank {:?} in {:?}", rank, s)))?;

        Ok(Self((rank * 8 + file) as u8))
    }
}

/// Side of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Moves first.
    #[display("white")]
    White,
    /// Moves second.
    #[display("black")]
    Black,
}

impl Color {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Piece a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, strum::EnumIter)]
pub enum PromotionKind {
    /// Queen (`q`).
    #[display("q")]
    Queen,
    /// Rook (`r`).
    #[display("r")]
    Rook,
    /// Bishop (`b`).
    #[display("b")]
    Bishop,
    /// Knight (`n`).
    #[display("n")]
    Knight,
}

impl PromotionKind {
    /// Promotion applied when a move does not name one.
    pub const DEFAULT: PromotionKind = PromotionKind::Queen;

    /// Parses a promotion code, accepting either case.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'q' => Some(PromotionKind::Queen),
            'r' => Some(PromotionKind::Rook),
            'b' => Some(PromotionKind::Bishop),
            'n' => Some(PromotionKind::Knight),
            _ => None,
        }
    }

    /// Lowercase promotion code.
    pub fn code(self) -> char {
        match self {
            PromotionKind::Queen => 'q',
            PromotionKind::Rook => 'r',
            PromotionKind::Bishop => 'b',
            PromotionKind::Knight => 'n',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_round_trips_through_text() {
        for square in Square::all() {
            let parsed: Square = square.to_string().parse().expect("valid square");
            assert_eq!(parsed, square);
        }
    }

    #[test]
    fn test_square_indexing_is_rank_major() {
        assert_eq!("a1".parse::<Square>().unwrap().index(), 0);
        assert_eq!("b1".parse::<Square>().unwrap().index(), 1);
        assert_eq!("a2".parse::<Square>().unwrap().index(), 8);
        assert_eq!("h8".parse::<Square>().unwrap().index(), 63);
    }

    #[test]
    fn test_square_rejects_bad_text() {
        assert!("".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
        assert!("e9".parse::<Square>().is_err());
        assert!("i1".parse::<Square>().is_err());
        assert!("e22".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_new_bounds() {
        assert_eq!(Square::new(4, 1).map(|s| s.to_string()), Some("e2".to_string()));
        assert!(Square::new(8, 0).is_none());
        assert!(Square::from_index(64).is_none());
    }

    #[test]
    fn test_color_opponent_and_display() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.to_string(), "white");
    }

    #[test]
    fn test_promotion_codes() {
        assert_eq!(PromotionKind::from_code('Q'), Some(PromotionKind::Queen));
        assert_eq!(PromotionKind::from_code('n'), Some(PromotionKind::Knight));
        assert_eq!(PromotionKind::from_code('k'), None);
        assert_eq!(PromotionKind::DEFAULT.code(), 'q');
    }
}
