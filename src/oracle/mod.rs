//! The remote move oracle: client seam, wire format and transports.

mod http;
mod local;
mod wire;

pub use http::HttpOracle;
pub use local::{LocalOracle, router as local_router};
pub use wire::{HealthStatus, OracleRequest, OracleResponse};

use oracle_chess_rules::Move;

/// Source of the non-human player's moves.
///
/// Implementations are stateless between calls: every request carries the
/// full history. The returned move is untrusted and still has to pass the
/// position store's legality gate.
#[async_trait::async_trait]
pub trait OracleClient: Send + Sync {
    /// Asks the oracle for the next move given the history so far.
    ///
    /// `history` holds four-character coordinate pairs, oldest first.
    async fn request_move(&self, history: &[String]) -> Result<Move, OracleError>;

    /// Returns the oracle's display name.
    fn name(&self) -> &str;
}

/// Failure of one oracle turn.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum OracleError {
    /// The transport failed or the oracle answered with an error status.
    #[display("Could not reach the oracle: {}", _0)]
    Unreachable(String),

    /// The payload did not have the expected shape.
    #[display("Malformed oracle response: {}", _0)]
    MalformedResponse(String),

    /// The payload parsed but the move is illegal in the current position.
    #[display("Oracle proposed an illegal move: {}", _0)]
    IllegalMoveProposed(Move),
}

impl std::error::Error for OracleError {}
