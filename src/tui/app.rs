//! Application state and logic.

use super::input::move_cursor;
use crate::controller::BoardUpdate;
use crossterm::event::KeyCode;
use oracle_chess_rules::{Color, DestinationMap, GameOutcome, Square};
use shakmaty::fen::Fen;
use tracing::{debug, warn};

/// Piece letter per square in FEN convention (uppercase white), indexed by
/// [`Square::index`].
pub type Grid = [Option<char>; 64];

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Leave the UI.
    Quit,
    /// Send a move attempt to the controller.
    Move(Square, Square),
    /// Start a new game.
    NewGame,
    /// Re-issue a failed oracle request.
    RetryOracle,
}

/// Main application state, fed by board updates from the controller.
pub struct App {
    grid: Grid,
    human: Color,
    turn: Color,
    cursor: Square,
    selected: Option<Square>,
    destinations: DestinationMap,
    last_move: Option<(Square, Square)>,
    awaiting_oracle: bool,
    outcome: Option<GameOutcome>,
    error: Option<String>,
    oracle_name: String,
}

impl App {
    /// Creates the view for a human playing `human` against `oracle_name`.
    pub fn new(human: Color, oracle_name: impl Into<String>) -> Self {
        let cursor = match human {
            Color::White => Square::new(4, 1),
            Color::Black => Square::new(4, 6),
        }
        .unwrap_or_default();

        Self {
            grid: [None; 64],
            human,
            turn: Color::White,
            cursor,
            selected: None,
            destinations: DestinationMap::default(),
            last_move: None,
            awaiting_oracle: false,
            outcome: None,
            error: None,
            oracle_name: oracle_name.into(),
        }
    }

    /// Piece letters by square.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Square under the cursor.
    pub fn cursor(&self) -> Square {
        self.cursor
    }

    /// Origin picked for the next move, if any.
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Last move played.
    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    /// True if the board is drawn from black's side.
    pub fn flipped(&self) -> bool {
        self.human == Color::Black
    }

    /// Returns true if `square` is a legal target of the selected origin.
    pub fn is_target(&self, square: Square) -> bool {
        self.selected
            .is_some_and(|origin| self.destinations.contains(origin, square))
    }

    /// Returns true if a piece on `square` can be picked up.
    pub fn is_movable(&self, square: Square) -> bool {
        self.input_enabled() && self.destinations.contains_origin(square)
    }

    fn input_enabled(&self) -> bool {
        !self.awaiting_oracle && self.outcome.is_none() && self.turn == self.human
    }

    /// One-line summary of the game for the status bar.
    pub fn status_message(&self) -> String {
        if let Some(outcome) = self.outcome {
            return format!("{}. Press 'n' for a new game or 'q' to quit.", outcome);
        }
        if self.awaiting_oracle {
            return format!("{} is thinking...", self.oracle_name);
        }
        if let Some(error) = &self.error {
            if self.turn != self.human {
                return format!("{}. Press 'r' to retry.", error);
            }
            return error.clone();
        }
        if self.turn == self.human {
            match self.selected {
                Some(origin) => format!("Your move ({}): {} selected", self.turn, origin),
                None => format!("Your move ({})", self.turn),
            }
        } else {
            format!("Oracle to move ({})", self.turn)
        }
    }

    /// Applies a board update from the controller.
    pub fn handle_update(&mut self, update: BoardUpdate) {
        debug!(?update, "Handling board update");

        match update {
            BoardUpdate::Position(fen) => match parse_grid(&fen) {
                Some(grid) => self.grid = grid,
                None => warn!(%fen, "Unreadable position"),
            },
            BoardUpdate::Turn(color) => {
                self.turn = color;
                self.selected = None;
            }
            BoardUpdate::LegalDestinations(map) => {
                self.destinations = map;
                if self
                    .selected
                    .is_some_and(|origin| !self.destinations.contains_origin(origin))
                {
                    self.selected = None;
                }
            }
            BoardUpdate::LastMove {
                origin,
                destination,
            } => {
                self.last_move = Some((origin, destination));
                self.error = None;
            }
            BoardUpdate::AwaitingOracle(awaiting) => {
                self.awaiting_oracle = awaiting;
                if awaiting {
                    self.error = None;
                }
            }
            BoardUpdate::GameOver(outcome) => {
                self.outcome = Some(outcome);
                self.selected = None;
            }
            BoardUpdate::Error(message) => self.error = Some(message),
        }
    }

    /// Translates a key press into an action, updating the cursor and
    /// selection along the way.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<AppAction> {
        match key {
            KeyCode::Char('q') => Some(AppAction::Quit),
            KeyCode::Char('n') => {
                self.reset_view();
                Some(AppAction::NewGame)
            }
            KeyCode::Char('r') => Some(AppAction::RetryOracle),
            KeyCode::Esc => {
                self.selected = None;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select(),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key, self.flipped());
                None
            }
            _ => None,
        }
    }

    fn select(&mut self) -> Option<AppAction> {
        if !self.input_enabled() {
            debug!("Selection ignored, not the human's turn");
            return None;
        }

        let square = self.cursor;
        match self.selected {
            Some(origin) if origin == square => {
                self.selected = None;
                None
            }
            Some(origin) if self.destinations.contains(origin, square) => {
                self.selected = None;
                Some(AppAction::Move(origin, square))
            }
            _ if self.destinations.contains_origin(square) => {
                self.selected = Some(square);
                None
            }
            _ => None,
        }
    }

    fn reset_view(&mut self) {
        debug!("Resetting view for new game");
        self.selected = None;
        self.last_move = None;
        self.outcome = None;
        self.error = None;
    }
}

/// Reads piece placement out of a FEN string.
pub fn parse_grid(fen: &str) -> Option<Grid> {
    let fen: Fen = fen.parse().ok()?;
    let setup = fen.as_setup();
    let mut grid = [None; 64];
    for square in Square::all() {
        let engine_square = shakmaty::Square::new(square.index() as u32);
        grid[square.index()] = setup.board.piece_at(engine_square).map(|p| p.char());
    }
    Some(grid)
}
