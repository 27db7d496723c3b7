//! Stand-in oracle service for offline play and tests.
//!
//! Serves the same endpoints as a real oracle. Instead of a model it replays
//! the history, sorts the legal moves in coordinate notation and answers with
//! the one at index `difficulty` (index 0 when out of range).

use super::{HealthStatus, OracleRequest, OracleResponse};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get, routing::post};
use oracle_chess_rules::{Move, PositionStore, RulesEngine, Square};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};

/// Name reported by the health endpoint.
pub const LOCAL_MODEL: &str = "local-sorted-legal";

/// Shared state of the stand-in oracle.
#[derive(Debug, Clone)]
pub struct LocalOracle {
    model: Arc<str>,
}

impl LocalOracle {
    /// Creates a stand-in oracle reporting `model` from its health endpoint.
    pub fn new(model: impl Into<Arc<str>>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Serves the oracle on an already bound listener until the task is dropped.
    #[instrument(skip_all)]
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        info!(%addr, model = %self.model, "Local oracle listening");
        axum::serve(listener, router(self)).await
    }

    /// Chooses a reply for `request`.
    ///
    /// # Errors
    ///
    /// A message describing the first history entry that cannot be replayed.
    #[instrument(skip(request), fields(plies = request.moves.len(), difficulty = ?request.difficulty))]
    pub fn choose(request: &OracleRequest) -> Result<OracleResponse, String> {
        let mut store = PositionStore::standard();
        for (ply, pair) in request.moves.iter().enumerate() {
            let mv: Move = pair
                .parse()
                .map_err(|e: oracle_chess_rules::NotationError| format!("ply {}: {}", ply, e.message))?;
            store
                .apply_move(mv)
                .map_err(|e| format!("ply {}: {}", ply, e))?;
        }

        if store.outcome().is_terminal() {
            debug!(outcome = %store.outcome(), "No move to propose");
            return Ok(OracleResponse::default());
        }

        let position = store.current_position();
        let mut legal: Vec<String> = Square::all()
            .flat_map(|origin| store.rules().legal_moves_from(&position, origin))
            .map(|m| m.to_string())
            .collect();
        legal.sort();

        let index = request
            .difficulty
            .map(|d| d as usize)
            .filter(|d| *d < legal.len())
            .unwrap_or(0);

        let proposed = legal.get(index).cloned();
        debug!(index, candidates = legal.len(), proposed = ?proposed, "Selected move");
        Ok(OracleResponse { proposed })
    }
}

impl Default for LocalOracle {
    fn default() -> Self {
        Self::new(LOCAL_MODEL)
    }
}

/// Builds the oracle's HTTP routes.
pub fn router(oracle: LocalOracle) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/move", post(propose_move))
        .with_state(oracle)
}

async fn health(State(oracle): State<LocalOracle>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        model: oracle.model.to_string(),
        device: "cpu".to_string(),
    })
}

async fn propose_move(
    Json(request): Json<OracleRequest>,
) -> Result<Json<OracleResponse>, (StatusCode, String)> {
    info!(moves = ?request.moves, "Moves so far");
    match LocalOracle::choose(&request) {
        Ok(response) => Ok(Json(response)),
        Err(message) => {
            warn!(%message, "Cannot replay history");
            Err((StatusCode::UNPROCESSABLE_ENTITY, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(moves: &[&str], difficulty: Option<u32>) -> OracleRequest {
        OracleRequest::new(moves.iter().map(|m| m.to_string()).collect(), difficulty)
    }

    #[test]
    fn test_choose_first_sorted_move() {
        let response = LocalOracle::choose(&request(&["e2e4"], None)).unwrap();
        assert_eq!(response.proposed.as_deref(), Some("a7a5"));
    }

    #[test]
    fn test_choose_honours_difficulty_offset() {
        let response = LocalOracle::choose(&request(&["e2e4"], Some(1))).unwrap();
        assert_eq!(response.proposed.as_deref(), Some("a7a6"));
    }

    #[test]
    fn test_out_of_range_difficulty_falls_back_to_first() {
        let response = LocalOracle::choose(&request(&["e2e4"], Some(500))).unwrap();
        assert_eq!(response.proposed.as_deref(), Some("a7a5"));
    }

    #[test]
    fn test_illegal_history_rejected() {
        let result = LocalOracle::choose(&request(&["e2e5"], None));
        assert!(result.unwrap_err().starts_with("ply 0"));
    }

    #[test]
    fn test_finished_game_has_no_move() {
        let response =
            LocalOracle::choose(&request(&["f2f3", "e7e5", "g2g4", "d8h4"], None)).unwrap();
        assert_eq!(response.proposed, None);
    }
}
