//! UI collaborator the controller pushes state into.

use oracle_chess_rules::{Color, DestinationMap, GameOutcome, Square};
use tokio::sync::mpsc;
use tracing::debug;

/// Widget-side view of the game.
///
/// Every call carries complete state for its concern, so repeating a call
/// with the same arguments has no further effect.
pub trait Board: Send {
    /// Shows the position given in FEN.
    fn set_position(&mut self, fen: &str);

    /// Shows whose turn it is.
    fn set_turn(&mut self, color: Color);

    /// Replaces the set of selectable origin/destination pairs.
    fn set_legal_destinations(&mut self, destinations: &DestinationMap);

    /// Highlights the last move played.
    fn set_last_move(&mut self, origin: Square, destination: Square);

    /// Disables or re-enables move input while the oracle is thinking.
    fn set_awaiting_oracle(&mut self, awaiting: bool);

    /// Announces the final outcome.
    fn notify_game_over(&mut self, outcome: GameOutcome);

    /// Shows a user-visible error.
    fn notify_error(&mut self, message: &str);
}

/// One call on [`Board`], as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardUpdate {
    /// Position in FEN.
    Position(String),
    /// Side to move.
    Turn(Color),
    /// Selectable moves.
    LegalDestinations(DestinationMap),
    /// Last move played.
    LastMove {
        /// Square the piece left.
        origin: Square,
        /// Square the piece reached.
        destination: Square,
    },
    /// Oracle activity.
    AwaitingOracle(bool),
    /// Final outcome.
    GameOver(GameOutcome),
    /// Error message.
    Error(String),
}

/// [`Board`] that forwards every call over a channel.
#[derive(Debug, Clone)]
pub struct ChannelBoard {
    tx: mpsc::UnboundedSender<BoardUpdate>,
}

impl ChannelBoard {
    /// Creates a board and the receiver for its updates.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BoardUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, update: BoardUpdate) {
        if self.tx.send(update).is_err() {
            debug!("Board receiver dropped, update discarded");
        }
    }
}

impl Board for ChannelBoard {
    fn set_position(&mut self, fen: &str) {
        self.send(BoardUpdate::Position(fen.to_string()));
    }

    fn set_turn(&mut self, color: Color) {
        self.send(BoardUpdate::Turn(color));
    }

    fn set_legal_destinations(&mut self, destinations: &DestinationMap) {
        self.send(BoardUpdate::LegalDestinations(destinations.clone()));
    }

    fn set_last_move(&mut self, origin: Square, destination: Square) {
        self.send(BoardUpdate::LastMove {
            origin,
            destination,
        });
    }

    fn set_awaiting_oracle(&mut self, awaiting: bool) {
        self.send(BoardUpdate::AwaitingOracle(awaiting));
    }

    fn notify_game_over(&mut self, outcome: GameOutcome) {
        self.send(BoardUpdate::GameOver(outcome));
    }

    fn notify_error(&mut self, message: &str) {
        self.send(BoardUpdate::Error(message.to_string()));
    }
}
