use serde::Serialize;

use crate::{
    challenges::{ChallengeError, ChallengeOverview},
    db::ChallengeProgress,
    settings::ChallengeSettings,
    AppState,
};

/// What went wrong, for the UI to branch on.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    NotJoined,
    OutOfSequence,
    CooldownActive,
    InvalidInput,
    Internal,
}

/// Error returned by every command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<u32>,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hours_remaining: None,
        }
    }
}

impl From<ChallengeError> for CommandError {
    fn from(err: ChallengeError) -> Self {
        let message = err.to_string();
        match err {
            ChallengeError::NotJoined => Self::new(ErrorKind::NotJoined, message),
            ChallengeError::OutOfSequence { .. } => Self::new(ErrorKind::OutOfSequence, message),
            ChallengeError::CooldownActive { hours_remaining } => Self {
                kind: ErrorKind::CooldownActive,
                message,
                hours_remaining: Some(hours_remaining),
            },
            ChallengeError::InvalidDay => Self::new(ErrorKind::InvalidInput, message),
            ChallengeError::Storage(err) => Self::new(ErrorKind::Internal, format!("{err:#}")),
        }
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(ErrorKind::Internal, format!("{err:#}"))
    }
}

pub async fn get_challenge_progress(
    state: &AppState,
    user_id: String,
    challenge_id: String,
) -> Result<Option<ChallengeProgress>, CommandError> {
    Ok(state.challenges.get_progress(&user_id, &challenge_id).await?)
}

pub async fn join_challenge(
    state: &AppState,
    user_id: String,
    challenge_id: String,
) -> Result<ChallengeProgress, CommandError> {
    Ok(state.challenges.join(&user_id, &challenge_id).await?)
}

pub async fn complete_challenge_day(
    state: &AppState,
    user_id: String,
    challenge_id: String,
    day: u32,
) -> Result<ChallengeProgress, CommandError> {
    Ok(state
        .challenges
        .complete_day(&user_id, &challenge_id, day)
        .await?)
}

pub async fn get_challenge_overview(
    state: &AppState,
    user_id: String,
    challenge_id: String,
) -> Result<ChallengeOverview, CommandError> {
    Ok(state.challenges.overview(&user_id, &challenge_id).await?)
}

pub async fn list_user_challenges(
    state: &AppState,
    user_id: String,
) -> Result<Vec<ChallengeProgress>, CommandError> {
    Ok(state.challenges.list_user_challenges(&user_id).await?)
}

pub fn get_challenge_settings(state: &AppState) -> ChallengeSettings {
    state.settings.challenge()
}

/// Persist new limits and apply them to the running engine.
pub fn set_challenge_settings(
    state: &AppState,
    settings: ChallengeSettings,
) -> Result<(), CommandError> {
    settings
        .validate()
        .map_err(|err| CommandError::new(ErrorKind::InvalidInput, err.to_string()))?;
    state.settings.update_challenge(settings.clone())?;
    state.challenges.set_policy(settings.policy());
    Ok(())
}

/// Pick up limits edited on disk.
pub fn reload_challenge_settings(state: &AppState) -> Result<ChallengeSettings, CommandError> {
    state.reload_settings()?;
    Ok(state.settings.challenge())
}
