//! Content catalog models.
//!
//! Day plans are keyed by 1-based day number so that "day N" never has to be
//! translated into an array index by callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tasks for a single challenge day, with an optional instruction per task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub tasks: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl DayPlan {
    /// Instruction paired with the task at `index`, if any.
    pub fn instruction_for(&self, index: usize) -> Option<&str> {
        self.instructions.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Remedy {
    pub id: String,
    pub title: String,
    pub category: String,
    pub duration: String,
    pub total_days: u32,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub days: BTreeMap<u32, DayPlan>,
    pub created_at: DateTime<Utc>,
}

impl Remedy {
    pub fn day_plan(&self, day: u32) -> Option<&DayPlan> {
        self.days.get(&day)
    }
}

/// Input for creating a catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedyInput {
    pub title: String,
    pub category: String,
    pub duration: String,
    pub total_days: u32,
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub days: BTreeMap<u32, DayPlan>,
}

/// Convert per-day task and instruction lists stored as parallel arrays
/// (entry 0 is day 1) into a day-keyed map.
pub fn day_plans_from_parallel(
    tasks: Vec<Vec<String>>,
    instructions: Vec<Vec<String>>,
) -> BTreeMap<u32, DayPlan> {
    let mut instructions = instructions.into_iter();
    tasks
        .into_iter()
        .enumerate()
        .map(|(index, tasks)| {
            let day = index as u32 + 1;
            let plan = DayPlan {
                tasks,
                instructions: instructions.next().unwrap_or_default(),
            };
            (day, plan)
        })
        .collect()
}
