use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_json, parse_optional_datetime, to_json, to_u32},
    models::ChallengeProgress,
};

const PROGRESS_COLUMNS: &str = "id, user_id, challenge_id, current_day, completed_days, batch_count, batch_start_time, joined_at, last_activity_at";

fn row_to_progress(row: &Row) -> Result<ChallengeProgress> {
    let current_day: i64 = row.get("current_day")?;
    let completed_days: String = row.get("completed_days")?;
    let batch_count: i64 = row.get("batch_count")?;
    let batch_start_time: Option<String> = row.get("batch_start_time")?;
    let joined_at: String = row.get("joined_at")?;
    let last_activity_at: String = row.get("last_activity_at")?;

    Ok(ChallengeProgress {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        challenge_id: row.get("challenge_id")?,
        current_day: to_u32(current_day, "current_day")?,
        completed_days: parse_json(&completed_days, "completed_days")?,
        batch_count: to_u32(batch_count, "batch_count")?,
        batch_start_time: parse_optional_datetime(batch_start_time, "batch_start_time")?,
        joined_at: parse_datetime(&joined_at, "joined_at")?,
        last_activity_at: parse_datetime(&last_activity_at, "last_activity_at")?,
    })
}

/// Point lookup on the unique (user, challenge) pair.
pub(crate) fn find_progress(
    conn: &Connection,
    user_id: &str,
    challenge_id: &str,
) -> Result<Option<ChallengeProgress>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROGRESS_COLUMNS}
         FROM user_challenges
         WHERE user_id = ?1 AND challenge_id = ?2"
    ))?;

    let mut rows = stmt.query(params![user_id, challenge_id])?;
    let progress = match rows.next()? {
        Some(row) => Some(row_to_progress(row)?),
        None => None,
    };
    Ok(progress)
}

/// Insert `progress` unless a record for its (user, challenge) pair exists.
/// Returns whether a row was written.
pub(crate) fn insert_progress_if_absent(
    conn: &Connection,
    progress: &ChallengeProgress,
) -> Result<bool> {
    let inserted = conn
        .execute(
            "INSERT INTO user_challenges (id, user_id, challenge_id, current_day, completed_days, batch_count, batch_start_time, joined_at, last_activity_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(user_id, challenge_id) DO NOTHING",
            params![
                progress.id,
                progress.user_id,
                progress.challenge_id,
                progress.current_day,
                to_json(&progress.completed_days, "completed_days")?,
                progress.batch_count,
                progress.batch_start_time.map(|dt| dt.to_rfc3339()),
                progress.joined_at.to_rfc3339(),
                progress.last_activity_at.to_rfc3339(),
            ],
        )
        .context("failed to insert challenge progress")?;
    Ok(inserted == 1)
}

/// Write back the mutable fields of `progress`.
pub(crate) fn update_progress(conn: &Connection, progress: &ChallengeProgress) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE user_challenges
             SET current_day = ?1,
                 completed_days = ?2,
                 batch_count = ?3,
                 batch_start_time = ?4,
                 last_activity_at = ?5
             WHERE id = ?6",
            params![
                progress.current_day,
                to_json(&progress.completed_days, "completed_days")?,
                progress.batch_count,
                progress.batch_start_time.map(|dt| dt.to_rfc3339()),
                progress.last_activity_at.to_rfc3339(),
                progress.id,
            ],
        )
        .context("failed to update challenge progress")?;

    if updated == 0 {
        anyhow::bail!("challenge progress {} disappeared during update", progress.id);
    }
    Ok(())
}

impl Database {
    pub async fn get_challenge_progress(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<ChallengeProgress>> {
        let user_id = user_id.to_string();
        let challenge_id = challenge_id.to_string();
        self.execute(move |conn| find_progress(conn, &user_id, &challenge_id))
            .await
    }

    /// All challenges a user has joined, most recently active first.
    pub async fn list_user_challenges(&self, user_id: &str) -> Result<Vec<ChallengeProgress>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROGRESS_COLUMNS}
                 FROM user_challenges
                 WHERE user_id = ?1
                 ORDER BY last_activity_at DESC"
            ))?;

            let mut rows = stmt.query(params![user_id])?;
            let mut challenges = Vec::new();
            while let Some(row) = rows.next()? {
                challenges.push(row_to_progress(row)?);
            }

            Ok(challenges)
        })
        .await
    }
}
