use std::sync::{Arc, RwLock};

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{
        repositories::{
            challenges::{find_progress, insert_progress_if_absent, update_progress},
            remedies::find_remedy,
        },
        ChallengeProgress, Database,
    },
    log_debug, log_info, log_warn,
};

use super::{
    clock::{Clock, SystemClock},
    error::ChallengeError,
    progression::{record_completion, Completion, RateLimitPolicy},
};

const ENABLE_LOGS: bool = true;

/// Where a user stands in a challenge, joined with catalog facts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOverview {
    pub progress: Option<ChallengeProgress>,
    /// `None` when the challenge id is not in the catalog.
    pub total_days: Option<u32>,
    pub finished: bool,
    /// Day the caller may complete next; `None` when not joined or finished.
    pub next_day: Option<u32>,
    pub cooldown_hours_remaining: Option<u32>,
}

#[derive(Clone)]
pub struct ChallengeEngine {
    db: Database,
    clock: Arc<dyn Clock>,
    policy: Arc<RwLock<RateLimitPolicy>>,
}

impl ChallengeEngine {
    pub fn new(db: Database, policy: RateLimitPolicy) -> Self {
        Self::with_clock(db, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Database, policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            policy: Arc::new(RwLock::new(policy)),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        match self.policy.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replace the rate-limit policy for subsequent calls.
    pub fn set_policy(&self, policy: RateLimitPolicy) {
        let mut guard = match self.policy.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = policy;
    }

    /// Progress for the pair, or `None` if the user never joined.
    pub async fn get_progress(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<ChallengeProgress>, ChallengeError> {
        Ok(self.db.get_challenge_progress(user_id, challenge_id).await?)
    }

    /// Create the progress record for the pair, or return the existing one
    /// untouched.
    pub async fn join(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<ChallengeProgress, ChallengeError> {
        let now = self.clock.now();
        let user = user_id.to_string();
        let challenge = challenge_id.to_string();

        let (progress, created) = self
            .db
            .transaction::<_, _, ChallengeError>(move |tx| {
                if let Some(existing) = find_progress(tx, &user, &challenge)? {
                    return Ok(Ok((existing, false)));
                }

                let candidate = ChallengeProgress::new(
                    format!("uc_{}", Uuid::new_v4()),
                    user.clone(),
                    challenge.clone(),
                    now,
                );
                let created = insert_progress_if_absent(tx, &candidate)?;

                // Re-read so a lost insert race still hands back the winner.
                match find_progress(tx, &user, &challenge)? {
                    Some(progress) => Ok(Ok((progress, created))),
                    None => Err(anyhow::anyhow!(
                        "challenge progress missing after insert for {user}/{challenge}"
                    )),
                }
            })
            .await??;

        if created {
            log_info!(
                "User {} joined challenge {}",
                progress.user_id,
                progress.challenge_id
            );
        }

        Ok(progress)
    }

    /// Mark `day` complete, enforcing day order and the batch rate limit.
    ///
    /// Re-completing a finished day returns the record unchanged. The read,
    /// the decision and the write happen in one database transaction.
    pub async fn complete_day(
        &self,
        user_id: &str,
        challenge_id: &str,
        day: u32,
    ) -> Result<ChallengeProgress, ChallengeError> {
        let now = self.clock.now();
        let policy = self.policy();
        let user = user_id.to_string();
        let challenge = challenge_id.to_string();

        let outcome = self
            .db
            .transaction(move |tx| {
                let Some(progress) = find_progress(tx, &user, &challenge)? else {
                    return Ok(Err(ChallengeError::NotJoined));
                };

                match record_completion(&progress, day, now, &policy) {
                    Ok(Completion::AlreadyCompleted) => Ok(Ok((progress, false))),
                    Ok(Completion::Recorded(updated)) => {
                        update_progress(tx, &updated)?;
                        Ok(Ok((updated, true)))
                    }
                    Err(err) => Ok(Err(err)),
                }
            })
            .await?;

        match outcome {
            Ok((progress, true)) => {
                log_info!(
                    "User {} completed day {} of {} (batch {}/{})",
                    user_id,
                    day,
                    challenge_id,
                    progress.batch_count,
                    policy.max_per_batch
                );
                Ok(progress)
            }
            Ok((progress, false)) => {
                log_debug!(
                    "Day {} of {} already completed by {}; nothing to do",
                    day,
                    challenge_id,
                    user_id
                );
                Ok(progress)
            }
            Err(ChallengeError::CooldownActive { hours_remaining }) => {
                log_warn!(
                    "User {} hit the completion limit on {}; {}h remaining",
                    user_id,
                    challenge_id,
                    hours_remaining
                );
                Err(ChallengeError::CooldownActive { hours_remaining })
            }
            Err(err) => Err(err),
        }
    }

    /// Progress plus catalog-derived status for one challenge.
    pub async fn overview(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<ChallengeOverview, ChallengeError> {
        let now = self.clock.now();
        let policy = self.policy();
        let user = user_id.to_string();
        let challenge = challenge_id.to_string();

        let (progress, remedy) = self
            .db
            .execute(move |conn| {
                let progress = find_progress(conn, &user, &challenge)?;
                let remedy = find_remedy(conn, &challenge)?;
                Ok((progress, remedy))
            })
            .await?;

        let total_days = remedy.map(|remedy| remedy.total_days);
        let finished = match (&progress, total_days) {
            (Some(progress), Some(total)) => progress.completed_count() >= total,
            _ => false,
        };
        let next_day = match &progress {
            Some(progress) if !finished => Some(progress.current_day),
            _ => None,
        };
        let cooldown_hours_remaining = match &progress {
            Some(progress) if !finished => policy.cooldown_hours_remaining(progress, now),
            _ => None,
        };

        Ok(ChallengeOverview {
            progress,
            total_days,
            finished,
            next_day,
            cooldown_hours_remaining,
        })
    }

    pub async fn list_user_challenges(
        &self,
        user_id: &str,
    ) -> Result<Vec<ChallengeProgress>, ChallengeError> {
        Ok(self.db.list_user_challenges(user_id).await?)
    }
}
