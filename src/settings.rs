use anyhow::{bail, Context, Result};
use chrono::Duration;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::challenges::{RateLimitPolicy, DEFAULT_MAX_PER_BATCH, DEFAULT_WINDOW_HOURS};

/// Challenge rate-limit settings as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSettings {
    pub max_per_batch: u32,
    pub window_hours: u32,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            max_per_batch: DEFAULT_MAX_PER_BATCH,
            window_hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

impl ChallengeSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_per_batch == 0 {
            bail!("maxPerBatch must be at least 1");
        }
        if self.window_hours == 0 {
            bail!("windowHours must be at least 1");
        }
        Ok(())
    }

    pub fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_per_batch: self.max_per_batch,
            window: Duration::hours(i64::from(self.window_hours)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    challenge: ChallengeSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            parse_settings(&contents, &path)
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn challenge(&self) -> ChallengeSettings {
        self.read().challenge.clone()
    }

    pub fn update_challenge(&self, settings: ChallengeSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        guard.challenge = settings;
        self.persist(&guard)
    }

    /// Re-read the settings file. Unreadable or invalid contents are an
    /// error and leave the current settings in place.
    pub fn reload(&self) -> Result<ChallengeSettings> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        data.challenge
            .validate()
            .with_context(|| format!("Invalid challenge limits in {}", self.path.display()))?;

        let challenge = data.challenge.clone();
        *self.write() = data;
        Ok(challenge)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn parse_settings(contents: &str, path: &std::path::Path) -> UserSettings {
    match serde_json::from_str::<UserSettings>(contents) {
        Ok(settings) if settings.challenge.validate().is_ok() => settings,
        Ok(_) => {
            warn!("Ignoring invalid challenge limits in {}", path.display());
            UserSettings::default()
        }
        Err(err) => {
            warn!("Ignoring unreadable settings file {}: {err}", path.display());
            UserSettings::default()
        }
    }
}
