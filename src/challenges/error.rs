use thiserror::Error;

fn hour_unit(hours: &u32) -> &'static str {
    if *hours == 1 {
        "hour"
    } else {
        "hours"
    }
}

/// Failures from the challenge engine. Each is scoped to a single call.
#[derive(Debug, Error)]
pub enum ChallengeError {
    /// No progress record exists for the user and challenge; join first.
    #[error("challenge has not been joined")]
    NotJoined,

    /// The day before `day` has not been completed yet.
    #[error("previous day must be completed before day {day}")]
    OutOfSequence { day: u32 },

    /// The current batch is full and its window has not expired.
    #[error("cooldown active: wait {hours_remaining} more {}", hour_unit(.hours_remaining))]
    CooldownActive { hours_remaining: u32 },

    /// Day numbers are 1-based.
    #[error("day numbers start at 1")]
    InvalidDay,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
