//! Turn orchestration between the human, the oracle and the board widget.

mod board;
mod state;
mod turn;

pub use board::{Board, BoardUpdate, ChannelBoard};
pub use state::TurnState;
pub use turn::{ControllerClosed, ControllerHandle, ControllerInput, InputRejected, TurnController};
