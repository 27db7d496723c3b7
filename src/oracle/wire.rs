//! JSON payloads exchanged with the oracle.

use super::OracleError;
use oracle_chess_rules::Move;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Body of `POST /move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRequest {
    /// History as coordinate pairs (`"e2e4"`), oldest first.
    pub moves: Vec<String>,
    /// Strength offset; 0 is strongest. Omitted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,
}

impl OracleRequest {
    /// Creates a request for the given history.
    pub fn new(moves: Vec<String>, difficulty: Option<u32>) -> Self {
        Self { moves, difficulty }
    }
}

/// Body returned by `POST /move`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponse {
    /// Proposed move, 4 or 5 characters of coordinate notation.
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub proposed: Option<String>,
}

impl OracleResponse {
    /// Creates a response proposing `mv`.
    pub fn proposing(mv: Move) -> Self {
        Self {
            proposed: Some(mv.to_string()),
        }
    }

    /// Extracts the proposed move.
    ///
    /// # Errors
    ///
    /// `OracleError::MalformedResponse` when the field is absent or is not
    /// coordinate notation.
    #[instrument]
    pub fn into_move(self) -> Result<Move, OracleError> {
        let Some(text) = self.proposed else {
            debug!("Oracle response has no move field");
            return Err(OracleError::MalformedResponse(
                "response has no move field".to_string(),
            ));
        };

        text.trim()
            .parse::<Move>()
            .map_err(|e| OracleError::MalformedResponse(format!("{:?}: {}", text, e.message)))
    }
}

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when ready.
    pub status: String,
    /// Model or engine identifier.
    pub model: String,
    /// Device the oracle runs on.
    pub device: String,
}
