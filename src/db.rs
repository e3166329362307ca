use std::str::FromStr;

use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub type DB = SqlitePool;

pub async fn open(path: &str) -> Result<DB> {
    let opts = SqliteConnectOptions::from_str(path)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    init(&pool).await?;

    Ok(pool)
}

/// Create the schema if it does not exist yet. Safe to run on every start.
pub async fn init(pool: &DB) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS templates (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL UNIQUE,
            kind       TEXT NOT NULL,
            notes      TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS template_items (
            id                  TEXT PRIMARY KEY,
            template_id         TEXT NOT NULL REFERENCES templates(id) ON DELETE CASCADE,
            position            INTEGER NOT NULL,
            exercise_name       TEXT NOT NULL,
            target_sets         INTEGER,
            target_reps         INTEGER,
            target_weight_kg    REAL,
            target_distance_km  REAL,
            target_duration_sec INTEGER,
            custom_metric_name  TEXT,
            custom_metric_unit  TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY,
            template_id TEXT REFERENCES templates(id) ON DELETE SET NULL,
            name        TEXT NOT NULL,
            kind        TEXT NOT NULL,
            started_at  TEXT NOT NULL DEFAULT (datetime('now')),
            ended_at    TEXT,
            notes       TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_exercises (
            id            TEXT PRIMARY KEY,
            session_id    TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            exercise_name TEXT NOT NULL,
            position      INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sets (
            id                  TEXT PRIMARY KEY,
            session_exercise_id TEXT NOT NULL REFERENCES session_exercises(id) ON DELETE CASCADE,
            set_number          INTEGER NOT NULL,
            reps                INTEGER,
            weight_kg           REAL,
            completed           INTEGER NOT NULL DEFAULT 1,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cardio_logs (
            id                  TEXT PRIMARY KEY,
            session_exercise_id TEXT NOT NULL UNIQUE REFERENCES session_exercises(id) ON DELETE CASCADE,
            distance_km         REAL,
            duration_sec        INTEGER,
            pace_sec_per_km     REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS custom_metric_logs (
            id                  TEXT PRIMARY KEY,
            session_exercise_id TEXT NOT NULL REFERENCES session_exercises(id) ON DELETE CASCADE,
            metric_name         TEXT NOT NULL,
            metric_value        REAL,
            metric_unit         TEXT,
            UNIQUE (session_exercise_id, metric_name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS personal_records (
            id                   TEXT PRIMARY KEY,
            exercise_name        TEXT NOT NULL,
            kind                 TEXT NOT NULL,
            best_weight_kg       REAL,
            best_reps            INTEGER,
            best_1rm_kg          REAL,
            best_distance_km     REAL,
            best_pace_sec_per_km REAL,
            best_duration_sec    INTEGER,
            achieved_at          TEXT,
            session_id           TEXT,
            updated_at           TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (exercise_name, kind)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE VIEW IF NOT EXISTS current_session AS
            SELECT * FROM sessions
            WHERE ended_at IS NULL
            ORDER BY started_at DESC
            LIMIT 1
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// In-memory database for tests. A single connection is required so every
/// query sees the same memory database instead of a fresh empty one.
#[cfg(test)]
pub async fn open_memory() -> Result<DB> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    init(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_is_idempotent() {
        let pool = open_memory().await.unwrap();
        init(&pool).await.unwrap();

        let (n,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sessions'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn current_session_view_tracks_open_session() {
        let pool = open_memory().await.unwrap();

        let none: Option<(String,)> = sqlx::query_as("SELECT id FROM current_session")
            .fetch_optional(&pool)
            .await
            .unwrap();
        assert!(none.is_none());

        sqlx::query("INSERT INTO sessions (id, name, kind) VALUES ('s1', 'Push Day', 'gym')")
            .execute(&pool)
            .await
            .unwrap();

        let open: Option<(String,)> = sqlx::query_as("SELECT id FROM current_session")
            .fetch_optional(&pool)
            .await
            .unwrap();
        assert_eq!(open, Some(("s1".into(),)));

        sqlx::query("UPDATE sessions SET ended_at = datetime('now') WHERE id = 's1'")
            .execute(&pool)
            .await
            .unwrap();

        let closed: Option<(String,)> = sqlx::query_as("SELECT id FROM current_session")
            .fetch_optional(&pool)
            .await
            .unwrap();
        assert!(closed.is_none());
    }
}
