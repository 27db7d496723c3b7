//! The turn controller actor.

use super::{Board, TurnState};
use crate::oracle::{OracleClient, OracleError};
use oracle_chess_rules::{
    Color, DestinationIndex, DestinationMap, GameOutcome, Move, MoveError, PositionStore,
    RulesEngine, Square, StandardRules,
};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// Everything that can reach the controller's inbox.
#[derive(Debug)]
pub enum ControllerInput {
    /// The human attempted a move on the board widget.
    HumanMove {
        /// Square the piece is picked up from.
        origin: Square,
        /// Square the piece is dropped on.
        destination: Square,
    },
    /// An oracle request finished.
    OracleReply {
        /// Session generation the request was issued in.
        generation: u64,
        /// Proposed move or the reason there is none.
        result: Result<Move, OracleError>,
    },
    /// Re-issue the oracle request after a failure.
    RetryOracle,
    /// Abandon the current game and start over.
    NewGame,
    /// Stop the controller loop.
    Shutdown,
}

/// Why an input was not acted on.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum InputRejected {
    /// An oracle request is in flight.
    #[display("Waiting for the oracle")]
    AwaitingOracle,
    /// The game has ended.
    #[display("The game is over")]
    GameOver,
    /// It is the oracle's turn; the request was re-issued instead.
    #[display("It is the oracle's turn")]
    OracleToMove,
    /// There is no failed oracle turn to retry.
    #[display("Nothing to retry")]
    NothingToRetry,
    /// The move failed the legality gate.
    #[display("{}", _0)]
    Illegal(MoveError),
}

impl std::error::Error for InputRejected {}

/// The controller has stopped and no longer reads its inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("Turn controller has shut down")]
pub struct ControllerClosed;

impl std::error::Error for ControllerClosed {}

/// Cloneable sender into a controller's inbox.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<ControllerInput>,
}

impl ControllerHandle {
    fn send(&self, input: ControllerInput) -> Result<(), ControllerClosed> {
        self.tx.send(input).map_err(|_| ControllerClosed)
    }

    /// Reports a move attempt from the board widget.
    pub fn human_move(&self, origin: Square, destination: Square) -> Result<(), ControllerClosed> {
        self.send(ControllerInput::HumanMove {
            origin,
            destination,
        })
    }

    /// Asks the controller to re-issue a failed oracle request.
    pub fn retry_oracle(&self) -> Result<(), ControllerClosed> {
        self.send(ControllerInput::RetryOracle)
    }

    /// Starts a new game.
    pub fn new_game(&self) -> Result<(), ControllerClosed> {
        self.send(ControllerInput::NewGame)
    }

    /// Stops the controller.
    pub fn shutdown(&self) -> Result<(), ControllerClosed> {
        self.send(ControllerInput::Shutdown)
    }
}

/// Runs one game session between a human and an oracle.
///
/// Owns the position store and the destination map. Inputs are handled one at
/// a time from a single inbox, so the oracle reply and UI events never race.
pub struct TurnController<B: Board, R: RulesEngine = StandardRules> {
    store: PositionStore<R>,
    destinations: DestinationMap,
    state: TurnState,
    human: Color,
    generation: u64,
    board: B,
    oracle: Arc<dyn OracleClient>,
    tx: mpsc::UnboundedSender<ControllerInput>,
    inbox: mpsc::UnboundedReceiver<ControllerInput>,
}

impl<B: Board> TurnController<B, StandardRules> {
    /// Creates a controller for a standard chess game.
    pub fn new(board: B, oracle: Arc<dyn OracleClient>, human: Color) -> Self {
        Self::with_rules(StandardRules::new(), board, oracle, human)
    }
}

impl<B: Board, R: RulesEngine> TurnController<B, R> {
    /// Creates a controller over an arbitrary rules engine.
    #[instrument(skip_all, fields(oracle = %oracle.name(), %human))]
    pub fn with_rules(rules: R, board: B, oracle: Arc<dyn OracleClient>, human: Color) -> Self {
        let store = PositionStore::new(rules);
        let destinations = DestinationIndex::recompute(store.rules(), &store.current_position());
        let (tx, inbox) = mpsc::unbounded_channel();
        info!("Created turn controller");
        Self {
            store,
            destinations,
            state: TurnState::WaitingForHuman,
            human,
            generation: 0,
            board,
            oracle,
            tx,
            inbox,
        }
    }

    /// Returns a sender into this controller's inbox.
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.tx.clone(),
        }
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// The authoritative position store.
    pub fn store(&self) -> &PositionStore<R> {
        &self.store
    }

    /// Legal destinations for the side to move.
    pub fn destinations(&self) -> &DestinationMap {
        &self.destinations
    }

    /// Session counter; increments on every new game.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Color the human plays.
    pub fn human(&self) -> Color {
        self.human
    }

    /// The board collaborator.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Pushes the initial state to the board and, if the oracle opens, asks it
    /// for the first move.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn start(&mut self) {
        info!(human = %self.human, "Starting session");
        self.board.set_awaiting_oracle(false);
        self.refresh_board();
        if self.store.side_to_move() != self.human {
            self.dispatch_oracle();
        }
    }

    /// Handles the next input from the inbox.
    ///
    /// Breaks when the input was `Shutdown`. The inbox never closes while the
    /// controller is alive because it holds a sender for oracle replies.
    pub async fn step(&mut self) -> ControlFlow<()> {
        match self.inbox.recv().await {
            Some(input) => self.process(input),
            None => ControlFlow::Break(()),
        }
    }

    /// Starts the session and handles inputs until shut down.
    #[instrument(skip(self), fields(oracle = %self.oracle.name()))]
    pub async fn run(mut self) {
        self.start();
        while self.step().await.is_continue() {}
        info!("Turn controller stopped");
    }

    /// Handles a single input.
    #[instrument(skip(self), fields(state = %self.state, generation = self.generation))]
    pub fn process(&mut self, input: ControllerInput) -> ControlFlow<()> {
        match input {
            ControllerInput::HumanMove {
                origin,
                destination,
            } => {
                if let Err(reason) = self.submit_human_move(origin, destination) {
                    debug!(%origin, %destination, %reason, "Human move not applied");
                }
            }
            ControllerInput::OracleReply { generation, result } => {
                self.on_oracle_reply(generation, result);
            }
            ControllerInput::RetryOracle => {
                if let Err(reason) = self.retry_oracle() {
                    debug!(%reason, "Retry ignored");
                }
            }
            ControllerInput::NewGame => self.new_game(),
            ControllerInput::Shutdown => {
                info!("Shutdown requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Applies a move the human made on the board.
    ///
    /// On success the oracle is asked for its reply unless the move ended the
    /// game. When the oracle's side is to move after a failed request, the
    /// request is re-issued and the move is not applied.
    ///
    /// # Errors
    ///
    /// The reason the move was not applied. An illegal move leaves the
    /// position and the board untouched.
    #[instrument(skip(self), fields(%origin, %destination))]
    pub fn submit_human_move(
        &mut self,
        origin: Square,
        destination: Square,
    ) -> Result<(), InputRejected> {
        match self.state {
            TurnState::GameOver => return Err(InputRejected::GameOver),
            TurnState::AwaitingOracle | TurnState::ApplyingOracleMove => {
                debug!("Move event during oracle turn rejected");
                return Err(InputRejected::AwaitingOracle);
            }
            TurnState::WaitingForHuman | TurnState::ApplyingHumanMove => {}
        }

        if self.store.side_to_move() != self.human {
            warn!("Oracle still owes a move, re-issuing request");
            self.dispatch_oracle();
            return Err(InputRejected::OracleToMove);
        }

        self.transition(TurnState::ApplyingHumanMove);
        if let Err(e) = self.store.apply_move(Move::new(origin, destination)) {
            debug!(error = %e, "Human move rejected");
            self.transition(TurnState::WaitingForHuman);
            return Err(InputRejected::Illegal(e));
        }

        self.refresh_board();
        if !self.finish_if_over() {
            self.dispatch_oracle();
        }
        Ok(())
    }

    /// Re-issues the oracle request after a failed oracle turn.
    ///
    /// # Errors
    ///
    /// `InputRejected` when no oracle turn is outstanding.
    #[instrument(skip(self))]
    pub fn retry_oracle(&mut self) -> Result<(), InputRejected> {
        match self.state {
            TurnState::GameOver => Err(InputRejected::GameOver),
            TurnState::AwaitingOracle | TurnState::ApplyingOracleMove => {
                Err(InputRejected::AwaitingOracle)
            }
            _ if self.store.side_to_move() == self.human => Err(InputRejected::NothingToRetry),
            _ => {
                info!("Retrying oracle request");
                self.dispatch_oracle();
                Ok(())
            }
        }
    }

    /// Abandons the current game and starts a fresh one.
    ///
    /// Replies to requests issued before this call are discarded.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) {
        self.generation += 1;
        self.store.reset();
        info!(generation = self.generation, "New game");
        self.transition(TurnState::WaitingForHuman);
        self.start();
    }

    #[instrument(skip(self, result), fields(current = self.generation))]
    fn on_oracle_reply(&mut self, generation: u64, result: Result<Move, OracleError>) {
        if generation != self.generation {
            debug!(generation, "Discarding stale oracle reply");
            return;
        }
        if self.state != TurnState::AwaitingOracle {
            warn!(state = %self.state, "Oracle reply without an outstanding request");
            return;
        }

        self.board.set_awaiting_oracle(false);

        let proposed = match result {
            Ok(mv) => mv,
            Err(e) => {
                self.fail_oracle_turn(e);
                return;
            }
        };

        self.transition(TurnState::ApplyingOracleMove);
        match self.store.apply_move(proposed) {
            Ok(_) => {
                self.refresh_board();
                if !self.finish_if_over() {
                    self.transition(TurnState::WaitingForHuman);
                }
            }
            Err(e) => {
                debug!(error = %e, "Oracle move failed the legality gate");
                self.fail_oracle_turn(OracleError::IllegalMoveProposed(proposed));
            }
        }
    }

    fn fail_oracle_turn(&mut self, error: OracleError) {
        warn!(%error, "Oracle turn failed");
        self.board.notify_error(&error.to_string());
        self.transition(TurnState::WaitingForHuman);
    }

    fn dispatch_oracle(&mut self) {
        self.transition(TurnState::AwaitingOracle);
        self.board.set_awaiting_oracle(true);

        let history = self.store.history_as_coordinate_pairs();
        let oracle = Arc::clone(&self.oracle);
        let tx = self.tx.clone();
        let generation = self.generation;
        let span = info_span!("oracle_request", generation, plies = history.len());

        tokio::spawn(
            async move {
                let result = oracle.request_move(&history).await;
                if tx
                    .send(ControllerInput::OracleReply { generation, result })
                    .is_err()
                {
                    debug!("Controller gone, oracle reply dropped");
                }
            }
            .instrument(span),
        );
    }

    fn refresh_board(&mut self) {
        self.destinations =
            DestinationIndex::recompute(self.store.rules(), &self.store.current_position());
        self.board.set_position(&self.store.serialized_position());
        self.board.set_turn(self.store.side_to_move());
        self.board.set_legal_destinations(&self.destinations);
        if let Some(last) = self.store.last_move() {
            self.board.set_last_move(last.origin(), last.destination());
        }
    }

    fn finish_if_over(&mut self) -> bool {
        let outcome = self.store.outcome();
        if outcome == GameOutcome::InProgress {
            return false;
        }
        info!(%outcome, plies = self.store.history().len(), "Game over");
        self.transition(TurnState::GameOver);
        self.board.notify_game_over(outcome);
        true
    }

    fn transition(&mut self, next: TurnState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "Turn state transition");
            self.state = next;
        }
    }
}
