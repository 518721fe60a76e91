#![allow(dead_code)]

use std::{collections::BTreeMap, path::Path, sync::Arc};

use chrono::{DateTime, TimeZone, Utc};
use strandly_lib::{
    challenges::ManualClock,
    db::{DayPlan, Remedy, RemedyInput},
    AppState,
};
use tempfile::TempDir;

pub const USER: &str = "user_ada";

pub struct Fixture {
    pub state: AppState,
    pub clock: ManualClock,
    // dropped last so the database file outlives the worker thread
    _dir: TempDir,
}

impl Fixture {
    pub fn data_dir(&self) -> &Path {
        self._dir.path()
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 7, 30, 0).unwrap()
}

pub fn fixture() -> Fixture {
    strandly_lib::init_logging();
    let dir = tempfile::tempdir().expect("temp dir");
    let clock = ManualClock::new(start_time());
    let state = AppState::open_with_clock(dir.path(), Arc::new(clock.clone())).expect("open app");
    Fixture {
        state,
        clock,
        _dir: dir,
    }
}

pub fn remedy_input(title: &str, category: &str, total_days: u32) -> RemedyInput {
    let days: BTreeMap<u32, DayPlan> = (1..=total_days)
        .map(|day| {
            (
                day,
                DayPlan {
                    tasks: vec![format!("{title} task for day {day}")],
                    instructions: vec![format!("do it gently on day {day}")],
                },
            )
        })
        .collect();

    RemedyInput {
        title: title.to_string(),
        category: category.to_string(),
        duration: format!("{total_days} days"),
        total_days,
        description: Some(format!("{title} challenge")),
        ingredients: vec!["rosemary oil".into(), "aloe vera".into()],
        days,
    }
}

pub async fn seed_remedy(state: &AppState, total_days: u32) -> Remedy {
    state
        .db
        .create_remedy(remedy_input("Rosemary Growth", "growth", total_days))
        .await
        .expect("create remedy")
}
