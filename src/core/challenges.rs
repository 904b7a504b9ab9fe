//! REST client and wire types for the daily-challenge backend.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("challenge API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("challenge API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Completed,
    Pending,
}

/// One recorded attempt, as embedded in challenge payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeAttempt {
    pub attempt_number: u32,
    pub score: u32,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub time_spent: Option<String>,
    /// Attempt date, `YYYY-MM-DD`.
    pub date: String,
    pub status: ChallengeStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: u64,
    /// Challenge date, `YYYY-MM-DD`.
    pub date: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub bloom_level: Option<String>,
    pub question: String,
    #[serde(default)]
    pub acceptance_rate: Option<f64>,
    pub status: ChallengeStatus,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub time_spent: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub attempts: Vec<ChallengeAttempt>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChallengeList {
    challenges: Vec<Challenge>,
}

/// Per-difficulty solved/total counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DifficultyCount {
    pub solved: u32,
    pub total: u32,
}

/// User statistics as reported by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStats {
    pub total_solved: u32,
    pub total_attempted: u32,
    pub attempting: u32,
    pub easy: DifficultyCount,
    pub medium: DifficultyCount,
    pub hard: DifficultyCount,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub monthly_attempts: u32,
}

/// The attempt-submission response uses snake_case field names, unlike the
/// read endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAttempt {
    pub attempt_number: u32,
    pub score: u32,
    pub answer: String,
    #[serde(default)]
    pub time_spent: Option<String>,
    pub status: ChallengeStatus,
}

#[derive(Clone)]
pub struct ChallengeClient {
    client: reqwest::Client,
    base_url: String,
    user_id: u32,
}

impl ChallengeClient {
    pub fn new(base_url: impl Into<String>, user_id: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            user_id,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(resp.json().await?)
    }

    /// Today's challenge for this user.
    pub async fn fetch_current(&self) -> Result<Challenge, ApiError> {
        self.get_json(format!(
            "{}/api/challenges/current?user_id={}",
            self.base_url, self.user_id
        ))
        .await
    }

    /// Challenge history, most recent first.
    pub async fn fetch_challenges(&self, limit: u32) -> Result<Vec<Challenge>, ApiError> {
        let list: ChallengeList = self
            .get_json(format!(
                "{}/api/challenges?user_id={}&page=1&limit={}",
                self.base_url, self.user_id, limit
            ))
            .await?;
        Ok(list.challenges)
    }

    /// User statistics (streaks, per-difficulty counts).
    pub async fn fetch_stats(&self) -> Result<ChallengeStats, ApiError> {
        self.get_json(format!(
            "{}/api/challenges/stats?user_id={}",
            self.base_url, self.user_id
        ))
        .await
    }

    /// Record an attempt for a challenge.
    pub async fn submit_attempt(
        &self,
        challenge_id: u64,
        answer: &str,
        score: u32,
        time_spent: &str,
    ) -> Result<SubmittedAttempt, ApiError> {
        let url = format!(
            "{}/api/challenges/{}/attempts",
            self.base_url, challenge_id
        );
        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "user_id": self.user_id,
                "answer": answer,
                "score": score,
                "time_spent": time_spent,
                "status": "completed",
            }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(resp.json().await?)
    }
}
