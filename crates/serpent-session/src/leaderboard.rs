use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A ranked score row as returned by the leaderboard backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub achieved_at: String,
}

#[derive(Debug)]
pub enum LeaderboardError {
    /// The backend could not be reached or returned garbage.
    Transport(String),
    /// The backend answered but refused the request.
    Rejected(String),
}

impl std::fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(m) => write!(f, "leaderboard transport error: {m}"),
            Self::Rejected(m) => write!(f, "leaderboard rejected request: {m}"),
        }
    }
}

impl std::error::Error for LeaderboardError {}

/// Score persistence boundary, consumed at game over. Implementations are
/// append-only and must rank descending by score. Failures are always
/// non-fatal to gameplay.
#[async_trait]
pub trait LeaderboardGateway: Send + Sync {
    async fn submit_score(&self, name: &str, score: u32) -> Result<(), LeaderboardError>;

    async fn fetch_top_scores(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

/// HTTP leaderboard backend speaking JSON: POST /scores, GET /scores?limit=N.
pub struct HttpLeaderboard {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLeaderboard {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("serpent-session/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    name: &'a str,
    score: u32,
    achieved_at: String,
}

#[async_trait]
impl LeaderboardGateway for HttpLeaderboard {
    async fn submit_score(&self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        let url = format!("{}/scores", self.base_url);
        let body = SubmitBody {
            name,
            score,
            achieved_at: timestamp_now(),
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(LeaderboardError::Rejected(format!("status {}", response.status())))
        }
    }

    async fn fetch_top_scores(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let url = format!("{}/scores?limit={limit}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(LeaderboardError::Rejected(format!("status {}", response.status())));
        }
        response
            .json::<Vec<LeaderboardEntry>>()
            .await
            .map_err(|e| LeaderboardError::Transport(e.to_string()))
    }
}

/// In-memory gateway for tests and offline play. Append-only; ranked on read.
#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    entries: Mutex<Vec<LeaderboardEntry>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardGateway for InMemoryLeaderboard {
    async fn submit_score(&self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LeaderboardError::Transport("lock poisoned".to_string()))?;
        entries.push(LeaderboardEntry {
            name: name.to_string(),
            score,
            achieved_at: timestamp_now(),
        });
        Ok(())
    }

    async fn fetch_top_scores(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LeaderboardError::Transport("lock poisoned".to_string()))?
            .clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Seconds since the Unix epoch with a Z suffix — enough ranking metadata
/// without pulling in a date crate.
fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}Z", dur.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_ranks_descending() {
        let board = InMemoryLeaderboard::new();
        board.submit_score("ana", 30).await.unwrap();
        board.submit_score("ben", 90).await.unwrap();
        board.submit_score("cal", 60).await.unwrap();

        let top = board.fetch_top_scores(10).await.unwrap();
        let scores: Vec<u32> = top.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![90, 60, 30]);
    }

    #[tokio::test]
    async fn in_memory_honors_limit() {
        let board = InMemoryLeaderboard::new();
        for i in 0..10 {
            board.submit_score("p", i * 10).await.unwrap();
        }
        let top = board.fetch_top_scores(3).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].score, 90);
    }

    #[tokio::test]
    async fn duplicate_scores_are_appended_not_merged() {
        let board = InMemoryLeaderboard::new();
        board.submit_score("ana", 50).await.unwrap();
        board.submit_score("ana", 50).await.unwrap();
        let top = board.fetch_top_scores(10).await.unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn error_display_is_informative() {
        let e = LeaderboardError::Rejected("status 503".to_string());
        assert!(e.to_string().contains("503"));
    }
}
