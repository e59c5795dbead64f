//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use laz_types::{Direction, Subscriber, VoteCounts, VoteSummary};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::path::Path;
use std::sync::Arc;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &Path, max_connections: u32) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path.display());

        let parent = database_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        tokio::fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;

        // Check if directory is writable
        let test_file = parent.join(".write_test");
        match tokio::fs::write(&test_file, b"test").await {
            Ok(_) => {
                let _ = tokio::fs::remove_file(&test_file).await;
                tracing::debug!("Database directory is writable");
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Database directory is not writable: {}: {}",
                    parent.display(),
                    e
                ));
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to SQLite database at: {}",
                    database_path.display()
                )
            })?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to create database schema")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Create both tables if they are missing. Safe to run repeatedly.
    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                item_slug TEXT NOT NULL,
                voter_hash TEXT NOT NULL,
                direction TEXT NOT NULL CHECK (direction IN ('up', 'down')),
                created_at TEXT NOT NULL,
                PRIMARY KEY (item_slug, voter_hash)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                email TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_subscribers_created_at
            ON subscribers (created_at)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Vote operations

    /// Record `direction` for the voter and return the item's new tally.
    ///
    /// Repeating the stored direction removes the vote, a different
    /// direction replaces it. The transaction opens with a write so the
    /// SQLite writer lock is held before the row is inspected.
    pub async fn cast_vote(
        &self,
        item_slug: &str,
        voter_hash: &str,
        direction: Direction,
        now: DateTime<Utc>,
    ) -> Result<VoteCounts> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM votes
            WHERE item_slug = ?1 AND voter_hash = ?2 AND direction = ?3
            "#,
        )
        .bind(item_slug)
        .bind(voter_hash)
        .bind(direction.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if removed == 0 {
            sqlx::query(
                r#"
                INSERT INTO votes (item_slug, voter_hash, direction, created_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT (item_slug, voter_hash) DO UPDATE
                SET direction = excluded.direction, created_at = excluded.created_at
                "#,
            )
            .bind(item_slug)
            .bind(voter_hash)
            .bind(direction.as_str())
            .bind(timestamp(now))
            .execute(&mut *tx)
            .await?;
        }

        let counts = tally(&mut *tx, item_slug).await?;
        tx.commit().await?;

        tracing::debug!(
            "Vote on {} by {}: {} ({})",
            item_slug,
            voter_hash,
            direction,
            if removed == 0 { "recorded" } else { "withdrawn" }
        );

        Ok(counts)
    }

    pub async fn get_counts(&self, item_slug: &str) -> Result<VoteCounts> {
        tally(&*self.pool, item_slug).await
    }

    pub async fn get_voter_direction(
        &self,
        item_slug: &str,
        voter_hash: &str,
    ) -> Result<Option<Direction>> {
        voter_direction(&*self.pool, item_slug, voter_hash).await
    }

    /// Counts and the voter's own direction, read from one snapshot
    pub async fn get_summary(&self, item_slug: &str, voter_hash: &str) -> Result<VoteSummary> {
        let mut tx = self.pool.begin().await?;

        let counts = tally(&mut *tx, item_slug).await?;
        let user_vote = voter_direction(&mut *tx, item_slug, voter_hash).await?;
        tx.commit().await?;

        Ok(VoteSummary { counts, user_vote })
    }

    // Subscriber operations

    /// Insert `email`, returning `false` if it was already subscribed.
    pub async fn subscribe(&self, email: &str, now: DateTime<Utc>) -> Result<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO subscribers (email, created_at)
            VALUES (?1, ?2)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(timestamp(now))
        .execute(&*self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    /// All subscribers, most recent first
    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        let rows: Vec<SubscriberRow> = sqlx::query_as(
            r#"
            SELECT email, created_at FROM subscribers
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

async fn tally<'e, E>(executor: E, item_slug: &'e str) -> Result<VoteCounts>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT direction, COUNT(*) FROM votes
        WHERE item_slug = ?1
        GROUP BY direction
        "#,
    )
    .bind(item_slug)
    .fetch_all(executor)
    .await?;

    let mut up = 0;
    let mut down = 0;
    for (direction, count) in rows {
        match direction.parse::<Direction>()? {
            Direction::Up => up = count,
            Direction::Down => down = count,
        }
    }

    Ok(VoteCounts::new(up, down))
}

async fn voter_direction<'e, E>(
    executor: E,
    item_slug: &'e str,
    voter_hash: &'e str,
) -> Result<Option<Direction>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT direction FROM votes WHERE item_slug = ?1 AND voter_hash = ?2
        "#,
    )
    .bind(item_slug)
    .bind(voter_hash)
    .fetch_optional(executor)
    .await?;

    let direction = row
        .map(|(direction,)| direction.parse::<Direction>())
        .transpose()?;

    Ok(direction)
}

/// Fixed-width RFC 3339 so text ordering matches time ordering
fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct SubscriberRow {
    email: String,
    created_at: DateTime<Utc>,
}

impl From<SubscriberRow> for Subscriber {
    fn from(r: SubscriberRow) -> Self {
        Subscriber {
            email: r.email,
            created_at: r.created_at,
        }
    }
}
