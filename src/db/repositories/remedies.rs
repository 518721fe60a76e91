use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_json, to_json, to_u32},
    models::{Remedy, RemedyInput},
};

const REMEDY_COLUMNS: &str =
    "id, title, category, duration, total_days, description, ingredients, days, created_at";

fn row_to_remedy(row: &Row) -> Result<Remedy> {
    let total_days: i64 = row.get("total_days")?;
    let ingredients: String = row.get("ingredients")?;
    let days: String = row.get("days")?;
    let created_at: String = row.get("created_at")?;

    Ok(Remedy {
        id: row.get("id")?,
        title: row.get("title")?,
        category: row.get("category")?,
        duration: row.get("duration")?,
        total_days: to_u32(total_days, "total_days")?,
        description: row.get("description")?,
        ingredients: parse_json(&ingredients, "ingredients")?,
        days: parse_json(&days, "days")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

pub(crate) fn validate_input(input: &RemedyInput) -> Result<()> {
    if input.title.trim().is_empty() {
        bail!("remedy title is required");
    }
    if input.total_days == 0 {
        bail!("remedy must last at least one day");
    }
    if let Some(day) = input
        .days
        .keys()
        .find(|&&day| day == 0 || day > input.total_days)
    {
        bail!(
            "day plan for day {day} is outside 1..={}",
            input.total_days
        );
    }
    Ok(())
}

pub(crate) fn find_remedy(conn: &Connection, remedy_id: &str) -> Result<Option<Remedy>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REMEDY_COLUMNS} FROM remedies WHERE id = ?1"
    ))?;
    let mut rows = stmt.query(params![remedy_id])?;
    let remedy = match rows.next()? {
        Some(row) => Some(row_to_remedy(row)?),
        None => None,
    };
    Ok(remedy)
}

fn collect_remedies(
    conn: &Connection,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Remedy>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(args)?;
    let mut remedies = Vec::new();
    while let Some(row) = rows.next()? {
        remedies.push(row_to_remedy(row)?);
    }
    Ok(remedies)
}

impl Database {
    /// Add a remedy to the catalog.
    pub async fn create_remedy(&self, input: RemedyInput) -> Result<Remedy> {
        validate_input(&input)?;

        self.execute(move |conn| {
            let id = format!("rm_{}", Uuid::new_v4());
            let now = Utc::now();

            conn.execute(
                "INSERT INTO remedies (id, title, category, duration, total_days, description, ingredients, days, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    input.title.trim(),
                    input.category,
                    input.duration,
                    input.total_days,
                    input.description,
                    to_json(&input.ingredients, "ingredients")?,
                    to_json(&input.days, "days")?,
                    now.to_rfc3339(),
                ],
            )
            .context("failed to insert remedy")?;

            find_remedy(conn, &id)?.ok_or_else(|| anyhow!("Remedy not found after insert"))
        })
        .await
    }

    pub async fn get_remedy(&self, remedy_id: &str) -> Result<Option<Remedy>> {
        let remedy_id = remedy_id.to_string();
        self.execute(move |conn| find_remedy(conn, &remedy_id)).await
    }

    /// Whole catalog, newest first.
    pub async fn list_remedies(&self) -> Result<Vec<Remedy>> {
        self.execute(|conn| {
            collect_remedies(
                conn,
                &format!("SELECT {REMEDY_COLUMNS} FROM remedies ORDER BY created_at DESC"),
                params![],
            )
        })
        .await
    }

    pub async fn list_remedies_by_category(&self, category: &str) -> Result<Vec<Remedy>> {
        let category = category.to_string();
        self.execute(move |conn| {
            collect_remedies(
                conn,
                &format!(
                    "SELECT {REMEDY_COLUMNS} FROM remedies
                     WHERE category = ?1
                     ORDER BY created_at DESC"
                ),
                params![category],
            )
        })
        .await
    }
}
