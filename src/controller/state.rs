//! Turn states of a session.

/// Where the controller is in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum TurnState {
    /// Move events from the UI are accepted.
    #[default]
    WaitingForHuman,
    /// A human move is passing the legality gate.
    ApplyingHumanMove,
    /// An oracle request is in flight.
    AwaitingOracle,
    /// An oracle move is passing the legality gate.
    ApplyingOracleMove,
    /// The game has ended.
    GameOver,
}

impl TurnState {
    /// Returns true if a move event from the UI may be applied.
    pub fn accepts_human_move(self) -> bool {
        self == TurnState::WaitingForHuman
    }
}
