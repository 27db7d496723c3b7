//! Oracle Chess library - a human plays chess against a remote move oracle
//!
//! # Architecture
//!
//! - **Rules**: position store, legality gate and destination index
//!   (re-exported from `oracle_chess_rules`)
//! - **Oracle**: HTTP client for the move oracle and a local stand-in server
//! - **Controller**: turn state machine driving a board widget
//! - **TUI**: terminal board built on ratatui
//!
//! # Example
//!
//! ```no_run
//! use oracle_chess::{ChannelBoard, Color, HttpOracle, TurnController};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let oracle = Arc::new(HttpOracle::new("http://localhost:8000", None)?);
//! let (board, _updates) = ChannelBoard::channel();
//! let controller = TurnController::new(board, oracle, Color::White);
//! let handle = controller.handle();
//! tokio::spawn(controller.run());
//! handle.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod controller;
mod oracle;
mod tui;

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, DEFAULT_CONFIG_FILE, ORACLE_URL_ENV};

// Crate-level exports - Turn orchestration
pub use controller::{
    Board, BoardUpdate, ChannelBoard, ControllerClosed, ControllerHandle, ControllerInput,
    InputRejected, TurnController, TurnState,
};

// Crate-level exports - Oracle
pub use oracle::{
    HealthStatus, HttpOracle, LocalOracle, OracleClient, OracleError, OracleRequest,
    OracleResponse, local_router,
};

// Crate-level exports - Terminal UI
pub use tui::run_tui;

// Crate-level exports - Rules
pub use oracle_chess_rules::{
    Color, DestinationIndex, DestinationMap, FIRST_MOVER, GameOutcome, Move, MoveError,
    NotationError, PositionStore, PromotionKind, RulesEngine, Square, StandardRules,
};
