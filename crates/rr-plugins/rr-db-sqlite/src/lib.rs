//! # rr-db-sqlite Implementation
//!
//! This module maps forum posts and the current build onto SQLite.
//! Each post is one row holding its full JSON graph (post + replies), so a
//! save is a whole-record overwrite keyed by id.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use rr_core::models::ForumPost;
use rr_core::traits::{BuildRepo, ForumRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS forum_posts (
        id         TEXT PRIMARY KEY,
        created_at TEXT NOT NULL,
        body       TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS build_selection (
        slot          INTEGER PRIMARY KEY CHECK (slot = 0),
        component_ids TEXT NOT NULL
    )",
];

#[derive(Clone)]
pub struct SqliteRecordRepo {
    pool: SqlitePool,
}

impl SqliteRecordRepo {
    /// Opens (creating if needed) the database at `url` and ensures the schema.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url '{url}'"))?
            .create_if_missing(true);

        // Every connection to ":memory:" is a separate database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("connecting to {url}"))?;

        for statement in SCHEMA {
            sqlx::query(*statement).execute(&pool).await?;
        }
        log::info!("sqlite store ready at {url}");
        Ok(Self { pool })
    }
}

fn decode_post(body: &str) -> anyhow::Result<ForumPost> {
    serde_json::from_str(body).context("decoding stored forum post")
}

#[async_trait]
impl ForumRepo for SqliteRecordRepo {
    /// Newest first. Upserts keep their rowid, so insertion order is creation order.
    async fn list_posts(&self) -> anyhow::Result<Vec<ForumPost>> {
        let rows = sqlx::query("SELECT body FROM forum_posts ORDER BY rowid DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| decode_post(&row.try_get::<String, _>("body")?))
            .collect()
    }

    async fn get_post(&self, id: &str) -> anyhow::Result<Option<ForumPost>> {
        let row = sqlx::query("SELECT body FROM forum_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(decode_post(&row.try_get::<String, _>("body")?)?)),
            None => Ok(None),
        }
    }

    async fn save_post(&self, post: &ForumPost) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO forum_posts (id, created_at, body) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET body = excluded.body",
        )
        .bind(&post.id)
        .bind(post.created_at.to_rfc3339())
        .bind(serde_json::to_string(post)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BuildRepo for SqliteRecordRepo {
    async fn load_build(&self) -> anyhow::Result<Vec<String>> {
        let row = sqlx::query("SELECT component_ids FROM build_selection WHERE slot = 0")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("component_ids")?;
                serde_json::from_str(&raw).context("decoding stored build")
            }
            None => Ok(Vec::new()),
        }
    }

    async fn save_build(&self, component_ids: &[String]) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO build_selection (slot, component_ids) VALUES (0, ?)
             ON CONFLICT(slot) DO UPDATE SET component_ids = excluded.component_ids",
        )
        .bind(serde_json::to_string(component_ids)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
