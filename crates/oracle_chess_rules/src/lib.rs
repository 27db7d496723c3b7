//! Pure chess turn logic for oracle_chess.
//!
//! - **Types**: squares, colors, promotion pieces, moves
//! - **Rules**: the [`RulesEngine`] capability and its standard implementation
//! - **Store**: [`PositionStore`], the single legality gate and move history
//! - **Destinations**: [`DestinationIndex`] and the per-turn [`DestinationMap`]

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod destinations;
mod outcome;
mod rules;
mod store;
mod types;

pub use action::{Move, MoveError, NotationError};
pub use destinations::{DestinationIndex, DestinationMap};
pub use outcome::GameOutcome;
pub use rules::{RulesEngine, StandardRules};
pub use store::{FIRST_MOVER, PositionStore};
pub use types::{Color, PromotionKind, Square};
