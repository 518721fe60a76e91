//! Day-completion rules for a single progress record.
//!
//! Everything here is pure: the caller reads the record, asks
//! [`record_completion`] what the next state should be, and persists it.
//! `now` is passed in so one call uses one clock reading throughout.

use chrono::{DateTime, Duration, Utc};

use super::error::ChallengeError;
use crate::db::ChallengeProgress;

pub const DEFAULT_MAX_PER_BATCH: u32 = 2;
pub const DEFAULT_WINDOW_HOURS: u32 = 12;

const HOUR_MS: i64 = 60 * 60 * 1000;
const HOUR_NS: i64 = HOUR_MS * 1_000_000;

/// Rolling limit on how many days may be completed per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_per_batch: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_per_batch: DEFAULT_MAX_PER_BATCH,
            window: Duration::hours(i64::from(DEFAULT_WINDOW_HOURS)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDecision {
    /// This completion opens a fresh batch at `now`.
    StartNew,
    /// This completion joins the batch already in progress.
    Continue,
}

impl RateLimitPolicy {
    /// Whole hours left before the full batch on `progress` expires, or
    /// `None` when a completion would be accepted at `now`.
    pub fn cooldown_hours_remaining(
        &self,
        progress: &ChallengeProgress,
        now: DateTime<Utc>,
    ) -> Option<u32> {
        let started = progress.batch_start_time?;
        if progress.batch_count < self.max_per_batch {
            return None;
        }

        // A batch stamped in the future counts as just started.
        let elapsed = (now - started).max(Duration::zero());
        if elapsed >= self.window {
            return None;
        }

        // Ceiling over the full-precision remainder; any time left is at
        // least one hour to wait.
        let remaining = self.window - elapsed;
        let hours = match remaining.num_nanoseconds() {
            Some(ns) => (ns + HOUR_NS - 1) / HOUR_NS,
            None => (remaining.num_milliseconds() + HOUR_MS - 1) / HOUR_MS,
        }
        .max(1);
        Some(u32::try_from(hours).unwrap_or(u32::MAX))
    }

    pub fn check(
        &self,
        progress: &ChallengeProgress,
        now: DateTime<Utc>,
    ) -> Result<BatchDecision, ChallengeError> {
        if let Some(hours_remaining) = self.cooldown_hours_remaining(progress, now) {
            return Err(ChallengeError::CooldownActive { hours_remaining });
        }

        if progress.batch_start_time.is_none() || progress.batch_count >= self.max_per_batch {
            Ok(BatchDecision::StartNew)
        } else {
            Ok(BatchDecision::Continue)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The day was already done; nothing to write.
    AlreadyCompleted,
    /// The record as it should be persisted.
    Recorded(ChallengeProgress),
}

/// Decide the outcome of completing `day` on `progress`.
pub fn record_completion(
    progress: &ChallengeProgress,
    day: u32,
    now: DateTime<Utc>,
    policy: &RateLimitPolicy,
) -> Result<Completion, ChallengeError> {
    if day == 0 {
        return Err(ChallengeError::InvalidDay);
    }

    if progress.is_day_completed(day) {
        return Ok(Completion::AlreadyCompleted);
    }

    if day > 1 && !progress.is_day_completed(day - 1) {
        return Err(ChallengeError::OutOfSequence { day });
    }

    let decision = policy.check(progress, now)?;

    let mut updated = progress.clone();
    match decision {
        BatchDecision::StartNew => {
            updated.batch_count = 1;
            updated.batch_start_time = Some(now);
        }
        BatchDecision::Continue => {
            updated.batch_count = progress.batch_count + 1;
        }
    }

    if let Err(position) = updated.completed_days.binary_search(&day) {
        updated.completed_days.insert(position, day);
    }
    updated.current_day = day + 1;
    updated.last_activity_at = now;

    Ok(Completion::Recorded(updated))
}
