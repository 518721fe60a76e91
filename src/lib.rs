pub mod catalog;
pub mod challenges;
pub mod db;
pub mod settings;
mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};

use challenges::{ChallengeEngine, Clock, SystemClock};
use db::Database;
use settings::SettingsStore;

pub const DATABASE_FILE: &str = "strandly.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

/// Everything a caller needs to serve commands.
pub struct AppState {
    pub db: Database,
    pub challenges: ChallengeEngine,
    pub settings: SettingsStore,
}

impl AppState {
    /// Open (or create) the database and settings under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_clock(data_dir, Arc::new(SystemClock))
    }

    pub fn open_with_clock(data_dir: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let database = Database::new(data_dir.join(DATABASE_FILE))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
        let policy = settings.challenge().policy();

        log::info!(
            "Challenge limit: {} completions per {}h",
            policy.max_per_batch,
            policy.window.num_hours()
        );

        Ok(Self {
            challenges: ChallengeEngine::with_clock(database.clone(), policy, clock),
            db: database,
            settings,
        })
    }

    /// Re-read `settings.json` and apply its limits to the engine.
    pub fn reload_settings(&self) -> Result<()> {
        let challenge = self.settings.reload()?;
        self.challenges.set_policy(challenge.policy());
        log::info!(
            "Reloaded challenge limit: {} completions per {}h",
            challenge.max_per_batch,
            challenge.window_hours
        );
        Ok(())
    }
}

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
