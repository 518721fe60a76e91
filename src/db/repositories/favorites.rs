use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::{Favorite, Remedy},
};

use super::remedies::find_remedy;

fn row_to_favorite(row: &Row) -> Result<Favorite> {
    let created_at: String = row.get("created_at")?;

    Ok(Favorite {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        remedy_id: row.get("remedy_id")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Mark a remedy as a favorite. Calling it again returns the existing entry.
    pub async fn add_favorite(&self, user_id: &str, remedy_id: &str) -> Result<Favorite> {
        let user_id = user_id.to_string();
        let remedy_id = remedy_id.to_string();
        self.execute(move |conn| {
            if find_remedy(conn, &remedy_id)?.is_none() {
                bail!("remedy {remedy_id} does not exist");
            }

            conn.execute(
                "INSERT INTO user_favorites (id, user_id, remedy_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id, remedy_id) DO NOTHING",
                params![
                    format!("fav_{}", Uuid::new_v4()),
                    user_id,
                    remedy_id,
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("failed to insert favorite")?;

            let mut stmt = conn.prepare(
                "SELECT id, user_id, remedy_id, created_at
                 FROM user_favorites
                 WHERE user_id = ?1 AND remedy_id = ?2",
            )?;
            let mut rows = stmt.query(params![user_id, remedy_id])?;
            let favorite = match rows.next()? {
                Some(row) => row_to_favorite(row)?,
                None => return Err(anyhow!("Favorite not found after insert")),
            };
            Ok(favorite)
        })
        .await
    }

    /// Remove a favorite; absent entries are ignored.
    pub async fn remove_favorite(&self, user_id: &str, remedy_id: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let remedy_id = remedy_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM user_favorites WHERE user_id = ?1 AND remedy_id = ?2",
                params![user_id, remedy_id],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn is_favorite(&self, user_id: &str, remedy_id: &str) -> Result<bool> {
        let user_id = user_id.to_string();
        let remedy_id = remedy_id.to_string();
        self.execute(move |conn| {
            let found: Option<String> = conn
                .query_row(
                    "SELECT id FROM user_favorites WHERE user_id = ?1 AND remedy_id = ?2",
                    params![user_id, remedy_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    /// Favorite remedies for a user, most recently favorited first.
    pub async fn list_favorites(&self, user_id: &str) -> Result<Vec<Remedy>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT remedy_id FROM user_favorites
                 WHERE user_id = ?1
                 ORDER BY created_at DESC",
            )?;
            let remedy_ids = stmt
                .query_map(params![user_id], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            drop(stmt);

            let mut remedies = Vec::with_capacity(remedy_ids.len());
            for remedy_id in remedy_ids {
                if let Some(remedy) = find_remedy(conn, &remedy_id)? {
                    remedies.push(remedy);
                }
            }
            Ok(remedies)
        })
        .await
    }
}
