//! Per-user challenge progress.
//!
//! One record exists per (user, challenge) pair. It is created by
//! `ChallengeEngine::join` and only mutated by `ChallengeEngine::complete_day`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    pub id: String,
    pub user_id: String,
    pub challenge_id: String,
    /// Next day the user is expected to complete (1-based).
    pub current_day: u32,
    /// Completed days, ascending, contiguous from 1.
    pub completed_days: Vec<u32>,
    /// Completions recorded in the current rate-limit batch.
    pub batch_count: u32,
    pub batch_start_time: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl ChallengeProgress {
    pub fn new(
        id: String,
        user_id: String,
        challenge_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            challenge_id,
            current_day: 1,
            completed_days: Vec::new(),
            batch_count: 0,
            batch_start_time: None,
            joined_at: now,
            last_activity_at: now,
        }
    }

    pub fn is_day_completed(&self, day: u32) -> bool {
        self.completed_days.binary_search(&day).is_ok()
    }

    pub fn completed_count(&self) -> u32 {
        self.completed_days.len() as u32
    }
}
