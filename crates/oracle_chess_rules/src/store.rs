//! Authoritative position, side to move and move history.
//!
//! Every candidate move, whoever proposed it, passes through
//! [`PositionStore::apply_move`]. There is no second path.

use crate::action::{Move, MoveError};
use crate::outcome::GameOutcome;
use crate::rules::{RulesEngine, StandardRules};
use crate::types::{Color, PromotionKind};
use tracing::{debug, info, instrument};

/// Color that opens every game.
pub const FIRST_MOVER: Color = Color::White;

/// Owns the rules-engine position and the append-only move history.
#[derive(Debug, Clone)]
pub struct PositionStore<R: RulesEngine = StandardRules> {
    rules: R,
    position: R::Position,
    history: Vec<Move>,
    // Repetition key of every position reached, starting position included.
    seen: Vec<String>,
}

impl PositionStore<StandardRules> {
    /// Creates a store for a standard chess game.
    pub fn standard() -> Self {
        Self::new(StandardRules::new())
    }
}

impl<R: RulesEngine> PositionStore<R> {
    /// Creates a store at the rules engine's initial position.
    #[instrument(skip(rules))]
    pub fn new(rules: R) -> Self {
        let position = rules.initial_position();
        let seen = vec![rules.repetition_key(&position)];
        Self {
            rules,
            position,
            history: Vec::new(),
            seen,
        }
    }

    /// Returns the rules engine.
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Validates `candidate` against the current position and applies it.
    ///
    /// A candidate without a promotion piece that needs one gets
    /// [`PromotionKind::DEFAULT`]. A rejected candidate leaves the store untouched.
    ///
    /// # Errors
    ///
    /// - `MoveError::GameOver` if the outcome is already terminal.
    /// - `MoveError::IllegalMove` if no legal move matches the candidate.
    #[instrument(skip(self), fields(candidate = %candidate, ply = self.history.len()))]
    pub fn apply_move(&mut self, candidate: Move) -> Result<R::Position, MoveError> {
        if self.outcome().is_terminal() {
            debug!("Rejecting move after game end");
            return Err(MoveError::GameOver);
        }

        let resolved = self.resolve(candidate)?;
        let next = self.rules.apply(&self.position, &resolved)?;

        // Verified before anything is committed so a failure leaves the store as it was.
        #[cfg(debug_assertions)]
        self.check_successor(&next)?;

        self.seen.push(self.rules.repetition_key(&next));
        self.position = next;
        self.history.push(resolved);

        info!(applied = %resolved, side_to_move = %self.side_to_move(), "Move applied");
        Ok(self.position.clone())
    }

    /// Finds the legal move the candidate denotes.
    fn resolve(&self, candidate: Move) -> Result<Move, MoveError> {
        let legal = self
            .rules
            .legal_moves_from(&self.position, candidate.origin());

        if legal.contains(&candidate) {
            return Ok(candidate);
        }

        if candidate.promotion().is_none() {
            let promoted = Move::with_promotion(
                candidate.origin(),
                candidate.destination(),
                PromotionKind::DEFAULT,
            );
            if legal.contains(&promoted) {
                return Ok(promoted);
            }
        }

        debug!(legal_from_origin = legal.len(), "Candidate matches no legal move");
        Err(MoveError::IllegalMove(candidate))
    }

    /// Snapshot of the current position.
    pub fn current_position(&self) -> R::Position {
        self.position.clone()
    }

    /// Color whose turn it is.
    pub fn side_to_move(&self) -> Color {
        self.rules.side_to_move(&self.position)
    }

    /// Outcome of the current position.
    ///
    /// Threefold repetition is judged from the history; everything else
    /// comes from the rules engine.
    pub fn outcome(&self) -> GameOutcome {
        match self.rules.classify(&self.position) {
            GameOutcome::InProgress if self.repetitions() >= 3 => GameOutcome::Draw,
            outcome => outcome,
        }
    }

    /// Number of times the current position has occurred.
    pub fn repetitions(&self) -> usize {
        let current = self.rules.repetition_key(&self.position);
        self.seen.iter().filter(|key| **key == current).count()
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// History as four-character origin/destination pairs, oldest first.
    pub fn history_as_coordinate_pairs(&self) -> Vec<String> {
        self.history.iter().map(Move::to_coordinate_pair).collect()
    }

    /// Current position in the board widget's format.
    pub fn serialized_position(&self) -> String {
        self.rules.serialize(&self.position)
    }

    /// Last applied move.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// Returns to the initial position with an empty history.
    #[instrument(skip(self), fields(discarded_plies = self.history.len()))]
    pub fn reset(&mut self) {
        info!("Resetting position store");
        self.position = self.rules.initial_position();
        self.history.clear();
        self.seen = vec![self.rules.repetition_key(&self.position)];
    }

    /// Checks that `next`, reached by one more ply, keeps history length and
    /// side to move in agreement.
    #[cfg(debug_assertions)]
    fn check_successor(&self, next: &R::Position) -> Result<(), MoveError> {
        check_alignment(
            self.history.len() + 1,
            self.seen.len() + 1,
            self.rules.side_to_move(next),
        )
    }

    /// Checks that history length and side to move agree.
    #[cfg(test)]
    fn check_invariants(&self) -> Result<(), MoveError> {
        check_alignment(self.history.len(), self.seen.len(), self.side_to_move())
    }
}

/// Even ply counts leave the first mover to move; every position reached,
/// the start included, has one repetition record.
#[cfg(any(test, debug_assertions))]
fn check_alignment(plies: usize, recorded: usize, side_to_move: Color) -> Result<(), MoveError> {
    let expected = if plies % 2 == 0 {
        FIRST_MOVER
    } else {
        FIRST_MOVER.opponent()
    };

    if side_to_move != expected {
        tracing::warn!(plies, %side_to_move, "History and side to move disagree");
        return Err(MoveError::InvariantViolation(format!(
            "{} plies played but {} to move",
            plies, side_to_move
        )));
    }

    if recorded != plies + 1 {
        return Err(MoveError::InvariantViolation(format!(
            "{} positions recorded for {} plies",
            recorded, plies
        )));
    }

    Ok(())
}
