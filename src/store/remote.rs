use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::GameSummary;
use crate::engine::error::SubmitError;

/// Body of `POST /api/scores`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u64,
    pub accuracy: u32,
    pub level: u32,
    pub user_id: String,
    pub round: u32,
}

impl ScoreSubmission {
    pub fn new(name: &str, user_id: &str, summary: &GameSummary) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() { "Anonymous" } else { name }.to_string(),
            score: summary.score,
            accuracy: summary.accuracy,
            level: summary.level,
            user_id: user_id.to_string(),
            round: summary.round,
        }
    }
}

/// One row of the shared leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteScore {
    #[serde(default = "anonymous")]
    pub name: String,
    pub score: u64,
    #[serde(default)]
    pub accuracy: u32,
    #[serde(default = "first_level")]
    pub level: u32,
}

fn anonymous() -> String {
    "Anonymous".to_string()
}

fn first_level() -> u32 {
    1
}

pub trait ScoreSink: Send + Sync {
    fn submit(&self, score: &ScoreSubmission) -> Result<(), SubmitError>;
    fn top(&self, limit: usize) -> Result<Vec<RemoteScore>, SubmitError>;
}

/// Score service reached over HTTP.
pub struct HttpScoreSink {
    base_url: String,
    #[cfg(feature = "network")]
    client: Option<reqwest::blocking::Client>,
}

impl HttpScoreSink {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            #[cfg(feature = "network")]
            client: reqwest::blocking::Client::builder()
                .timeout(crate::generator::http::REQUEST_TIMEOUT)
                .build()
                .ok(),
        }
    }

    pub fn scores_url(&self) -> String {
        format!("{}/api/scores", self.base_url)
    }

    pub fn top_url(&self, limit: usize) -> String {
        format!("{}/api/scores/top?limit={}", self.base_url, limit.max(1))
    }

    #[cfg(feature = "network")]
    fn client(&self) -> Result<&reqwest::blocking::Client, SubmitError> {
        self.client
            .as_ref()
            .ok_or_else(|| SubmitError::Transport("http client not built".to_string()))
    }
}

#[cfg(feature = "network")]
impl ScoreSink for HttpScoreSink {
    fn submit(&self, score: &ScoreSubmission) -> Result<(), SubmitError> {
        let response = self
            .client()?
            .post(self.scores_url())
            .json(score)
            .send()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SubmitError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<RemoteScore>, SubmitError> {
        let response = self
            .client()?
            .get(self.top_url(limit))
            .send()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SubmitError::Status(response.status().as_u16()));
        }
        response
            .json()
            .map_err(|e| SubmitError::Transport(e.to_string()))
    }
}

#[cfg(not(feature = "network"))]
impl ScoreSink for HttpScoreSink {
    fn submit(&self, _score: &ScoreSubmission) -> Result<(), SubmitError> {
        Err(SubmitError::Disabled)
    }

    fn top(&self, _limit: usize) -> Result<Vec<RemoteScore>, SubmitError> {
        Err(SubmitError::Disabled)
    }
}

/// Sends the score on a background thread. Failures are logged and dropped;
/// the caller never waits.
pub fn submit_detached(sink: Arc<dyn ScoreSink>, score: ScoreSubmission) -> thread::JoinHandle<()> {
    thread::spawn(move || match sink.submit(&score) {
        Ok(()) => debug!(score = score.score, "score submitted"),
        Err(e) => warn!(error = %e, "score submission failed"),
    })
}
