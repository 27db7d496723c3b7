//! HTTP oracle client.

use super::{HealthStatus, OracleClient, OracleError, OracleRequest, OracleResponse};
use oracle_chess_rules::Move;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Oracle reached over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    base_url: String,
    client: reqwest::Client,
    difficulty: Option<u32>,
}

impl HttpOracle {
    /// Creates a client for the oracle at `base_url`.
    ///
    /// Without a timeout a hung request waits indefinitely.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            debug!(?timeout, "Applying oracle request timeout");
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client: builder.build()?,
            difficulty: None,
        })
    }

    /// Sends `difficulty` with every request.
    pub fn with_difficulty(mut self, difficulty: Option<u32>) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Base URL of the oracle.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Queries the oracle's health endpoint.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<HealthStatus, OracleError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        // An error status still delivered a body; its shape decides the error.
        let health: HealthStatus = serde_json::from_str(&body).map_err(|e| {
            OracleError::MalformedResponse(format!("HTTP {}: {}: {}", status, e, body))
        })?;
        info!(status = %health.status, model = %health.model, device = %health.device, "Oracle healthy");
        Ok(health)
    }
}

#[async_trait::async_trait]
impl OracleClient for HttpOracle {
    #[instrument(skip(self, history), fields(plies = history.len(), base_url = %self.base_url))]
    async fn request_move(&self, history: &[String]) -> Result<Move, OracleError> {
        let request = OracleRequest::new(history.to_vec(), self.difficulty);
        debug!(moves = ?request.moves, "Sending moves to oracle");

        let response = self
            .client
            .post(format!("{}/move", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Oracle request failed");
                OracleError::Unreachable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Oracle answered with error status");
        }

        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;
        debug!(body = %body, "Oracle response");

        let parsed: OracleResponse = serde_json::from_str(&body).map_err(|e| {
            OracleError::MalformedResponse(format!("HTTP {}: {}: {}", status, e, body))
        })?;
        let proposed = parsed.into_move()?;

        info!(proposed = %proposed, "Oracle proposed move");
        Ok(proposed)
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
