//! Rules engine capability and the standard chess implementation.

use crate::action::{Move, MoveError};
use crate::outcome::GameOutcome;
use crate::types::{Color, PromotionKind, Square};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position as _, Role};
use tracing::{debug, instrument};

/// Capability interface onto a chess rules implementation.
///
/// The store and the destination index only ever talk to the rules through
/// this trait, so any compliant engine can be substituted.
pub trait RulesEngine {
    /// Opaque position state owned by the engine.
    type Position: Clone + std::fmt::Debug;

    /// Position at the start of a game.
    fn initial_position(&self) -> Self::Position;

    /// Color whose turn it is.
    fn side_to_move(&self, position: &Self::Position) -> Color;

    /// Legal moves of the side to move that start on `origin`.
    ///
    /// Empty when the square is vacant, holds an opposing piece, or the piece
    /// has no legal move.
    fn legal_moves_from(&self, position: &Self::Position, origin: Square) -> Vec<Move>;

    /// Plays `action`, returning the successor position.
    ///
    /// # Errors
    ///
    /// Returns `MoveError::IllegalMove` if `action` is not legal in `position`.
    fn apply(&self, position: &Self::Position, action: &Move) -> Result<Self::Position, MoveError>;

    /// Outcome visible from the position alone.
    fn classify(&self, position: &Self::Position) -> GameOutcome;

    /// Textual snapshot for the board widget (FEN).
    fn serialize(&self, position: &Self::Position) -> String;

    /// Key identifying the position for repetition counting.
    fn repetition_key(&self, position: &Self::Position) -> String;
}

/// Standard chess rules backed by `shakmaty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    /// Creates the standard rules engine.
    pub fn new() -> Self {
        Self
    }
}

fn to_engine_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::new(square.index() as u32)
}

fn from_engine_square(square: shakmaty::Square) -> Square {
    Square(square as u8)
}

fn to_engine_role(promotion: PromotionKind) -> Role {
    match promotion {
        PromotionKind::Queen => Role::Queen,
        PromotionKind::Rook => Role::Rook,
        PromotionKind::Bishop => Role::Bishop,
        PromotionKind::Knight => Role::Knight,
    }
}

fn from_engine_role(role: Role) -> Option<PromotionKind> {
    match role {
        Role::Queen => Some(PromotionKind::Queen),
        Role::Rook => Some(PromotionKind::Rook),
        Role::Bishop => Some(PromotionKind::Bishop),
        Role::Knight => Some(PromotionKind::Knight),
        Role::Pawn | Role::King => None,
    }
}

fn from_engine_color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

impl RulesEngine for StandardRules {
    type Position = Chess;

    fn initial_position(&self) -> Chess {
        Chess::default()
    }

    fn side_to_move(&self, position: &Chess) -> Color {
        from_engine_color(position.turn())
    }

    #[instrument(skip(self, position), fields(origin = %origin))]
    fn legal_moves_from(&self, position: &Chess, origin: Square) -> Vec<Move> {
        let from = to_engine_square(origin);

        // Castling is reported king-to-target ("e1g1"), never king-takes-rook.
        position
            .legal_moves()
            .iter()
            .filter(|m| m.from() == Some(from))
            .filter_map(|m| match m.to_uci(CastlingMode::Standard) {
                UciMove::Normal {
                    from,
                    to,
                    promotion,
                } => {
                    let (origin, destination) = (from_engine_square(from), from_engine_square(to));
                    Some(match promotion.and_then(from_engine_role) {
                        Some(kind) => Move::with_promotion(origin, destination, kind),
                        None => Move::new(origin, destination),
                    })
                }
                _ => None,
            })
            .collect()
    }

    #[instrument(skip(self, position), fields(action = %action))]
    fn apply(&self, position: &Chess, action: &Move) -> Result<Chess, MoveError> {
        let uci = UciMove::Normal {
            from: to_engine_square(action.origin()),
            to: to_engine_square(action.destination()),
            promotion: action.promotion().map(to_engine_role),
        };

        let engine_move = uci.to_move(position).map_err(|e| {
            debug!(error = %e, "Rules engine rejected move");
            MoveError::IllegalMove(*action)
        })?;

        let mut next = position.clone();
        next.play_unchecked(&engine_move);
        Ok(next)
    }

    fn classify(&self, position: &Chess) -> GameOutcome {
        if position.is_checkmate() {
            GameOutcome::Win(from_engine_color(position.turn()).opponent())
        } else if position.is_stalemate() {
            GameOutcome::Stalemate
        } else if position.is_insufficient_material() || position.halfmoves() >= 100 {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        }
    }

    fn serialize(&self, position: &Chess) -> String {
        Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
    }

    fn repetition_key(&self, position: &Chess) -> String {
        // Placement, side to move, castling rights, en passant; no clocks.
        self.serialize(position)
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
