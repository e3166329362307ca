//! Typed queries over the workout database, plus the adapters that turn
//! raw rows into the shapes the aggregation code consumes.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::DB;
use crate::metrics::history::{CardioSample, WeightSample};
use crate::metrics::records::{
    CardioLogEntry, CardioRecord, GymRecord, SetEntry, cardio_record, gym_record,
};
use crate::metrics::summary::{SessionStamp, VolumeSet};
use crate::models::{
    CardioRow, CustomMetricRow, PersonalRecord, Session, SessionExercise, SetRow, Template,
    TemplateItem,
};

/// One logged value of a custom metric, dated by its session.
#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint {
    pub date: String,
    pub value: f64,
    pub unit: Option<String>,
}

/// Timestamps are stored as sqlite `datetime('now')` strings, which are UTC.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("parsing timestamp `{ts}`"))?;

    Ok(naive.and_utc())
}

pub async fn current_session(db: &DB) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT id, template_id, name, kind, started_at, ended_at, notes FROM current_session",
    )
    .fetch_optional(db)
    .await?;

    Ok(session)
}

/// Resolve a completed session from a 1-based recency index (as printed by
/// `history list`, newest first) or a full session id.
pub async fn session_by_ref(db: &DB, reference: &str) -> Result<Option<Session>> {
    let session = if let Ok(idx) = reference.parse::<i64>() {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, template_id, name, kind, started_at, ended_at, notes
            FROM sessions
            WHERE ended_at IS NOT NULL
            ORDER BY started_at DESC
            LIMIT 1 OFFSET ?
            "#,
        )
        .bind(idx - 1)
        .fetch_optional(db)
        .await?
    } else {
        sqlx::query_as::<_, Session>(
            "SELECT id, template_id, name, kind, started_at, ended_at, notes FROM sessions WHERE id = ?",
        )
        .bind(reference)
        .fetch_optional(db)
        .await?
    };

    Ok(session)
}

pub async fn session_exercises(db: &DB, session_id: &str) -> Result<Vec<SessionExercise>> {
    let exercises = sqlx::query_as::<_, SessionExercise>(
        "SELECT id, exercise_name, position FROM session_exercises WHERE session_id = ? ORDER BY position",
    )
    .bind(session_id)
    .fetch_all(db)
    .await?;

    Ok(exercises)
}

/// Resolve an exercise in a session from its 1-based position or exact name.
pub async fn session_exercise_by_ref(
    db: &DB,
    session_id: &str,
    reference: &str,
) -> Result<Option<SessionExercise>> {
    let exercise = if let Ok(idx) = reference.parse::<i64>() {
        sqlx::query_as::<_, SessionExercise>(
            r#"
            SELECT id, exercise_name, position
            FROM session_exercises
            WHERE session_id = ?
            ORDER BY position
            LIMIT 1 OFFSET ?
            "#,
        )
        .bind(session_id)
        .bind(idx - 1)
        .fetch_optional(db)
        .await?
    } else {
        sqlx::query_as::<_, SessionExercise>(
            r#"
            SELECT id, exercise_name, position
            FROM session_exercises
            WHERE session_id = ? AND exercise_name = ?
            ORDER BY position
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .bind(reference)
        .fetch_optional(db)
        .await?
    };

    Ok(exercise)
}

pub async fn sets_for_exercise(db: &DB, session_exercise_id: &str) -> Result<Vec<SetRow>> {
    let sets = sqlx::query_as::<_, SetRow>(
        "SELECT id, set_number, reps, weight_kg, completed FROM sets WHERE session_exercise_id = ? ORDER BY set_number",
    )
    .bind(session_exercise_id)
    .fetch_all(db)
    .await?;

    Ok(sets)
}

pub async fn cardio_for_exercise(db: &DB, session_exercise_id: &str) -> Result<Option<CardioRow>> {
    let log = sqlx::query_as::<_, CardioRow>(
        "SELECT distance_km, duration_sec, pace_sec_per_km FROM cardio_logs WHERE session_exercise_id = ?",
    )
    .bind(session_exercise_id)
    .fetch_optional(db)
    .await?;

    Ok(log)
}

pub async fn metrics_for_exercise(
    db: &DB,
    session_exercise_id: &str,
) -> Result<Vec<CustomMetricRow>> {
    let metrics = sqlx::query_as::<_, CustomMetricRow>(
        "SELECT metric_name, metric_value, metric_unit FROM custom_metric_logs WHERE session_exercise_id = ? ORDER BY metric_name",
    )
    .bind(session_exercise_id)
    .fetch_all(db)
    .await?;

    Ok(metrics)
}

/// Every exercise name this database has ever seen, for typo suggestions.
pub async fn exercise_names(db: &DB) -> Result<Vec<String>> {
    let names = sqlx::query_scalar(
        r#"
        SELECT DISTINCT exercise_name FROM (
            SELECT exercise_name FROM session_exercises
            UNION
            SELECT exercise_name FROM template_items
        )
        ORDER BY exercise_name
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(names)
}

/// Resolve a template from a 1-based index (alphabetical, as printed by
/// `template list`) or its exact name.
pub async fn template_by_ref(db: &DB, reference: &str) -> Result<Option<Template>> {
    let id: Option<String> = if let Ok(idx) = reference.parse::<i64>() {
        sqlx::query_scalar(
            r#"
            SELECT id
            FROM (
              SELECT id, ROW_NUMBER() OVER (ORDER BY name) AS rn
              FROM templates
            ) t
            WHERE t.rn = ?
            "#,
        )
        .bind(idx)
        .fetch_optional(db)
        .await?
    } else {
        sqlx::query_scalar("SELECT id FROM templates WHERE name = ?")
            .bind(reference)
            .fetch_optional(db)
            .await?
    };

    let Some(id) = id else {
        return Ok(None);
    };

    let template = sqlx::query_as::<_, Template>(
        "SELECT id, name, kind, notes, created_at FROM templates WHERE id = ?",
    )
    .bind(&id)
    .fetch_optional(db)
    .await?;

    Ok(template)
}

pub async fn template_items(db: &DB, template_id: &str) -> Result<Vec<TemplateItem>> {
    let items = sqlx::query_as::<_, TemplateItem>(
        r#"
        SELECT position, exercise_name, target_sets, target_reps, target_weight_kg,
               target_distance_km, target_duration_sec, custom_metric_name, custom_metric_unit
        FROM template_items
        WHERE template_id = ?
        ORDER BY position
        "#,
    )
    .bind(template_id)
    .fetch_all(db)
    .await?;

    Ok(items)
}

/// All strength sets ever logged for `exercise` in completed sessions,
/// oldest first, in the shape the record fold expects.
pub async fn gym_set_entries(db: &DB, exercise: &str) -> Result<Vec<SetEntry>> {
    let rows = sqlx::query_as::<_, (Option<f64>, Option<i64>, bool, String, String)>(
        r#"
        SELECT st.weight_kg, st.reps, st.completed, s.started_at, s.id
        FROM sets st
        JOIN session_exercises se ON se.id = st.session_exercise_id
        JOIN sessions s ON s.id = se.session_id
        WHERE se.exercise_name = ? AND s.ended_at IS NOT NULL
        ORDER BY s.started_at ASC, st.set_number ASC
        "#,
    )
    .bind(exercise)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(weight_kg, reps, completed, started_at, session_id)| SetEntry {
            weight_kg,
            reps,
            completed,
            date: started_at[..10].to_string(),
            session_id,
        })
        .collect())
}

pub async fn cardio_log_entries(db: &DB, exercise: &str) -> Result<Vec<CardioLogEntry>> {
    let rows = sqlx::query_as::<_, (Option<f64>, Option<i64>, String, String)>(
        r#"
        SELECT cl.distance_km, cl.duration_sec, s.started_at, s.id
        FROM cardio_logs cl
        JOIN session_exercises se ON se.id = cl.session_exercise_id
        JOIN sessions s ON s.id = se.session_id
        WHERE se.exercise_name = ? AND s.ended_at IS NOT NULL
        ORDER BY s.started_at ASC
        "#,
    )
    .bind(exercise)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(distance_km, duration_sec, started_at, session_id)| CardioLogEntry {
            distance_km,
            duration_sec,
            date: started_at[..10].to_string(),
            session_id,
        })
        .collect())
}

/// Completed, weighted sets for `exercise`, oldest first. Incomplete sets
/// and sets without a weight never reach the history fold.
pub async fn weight_samples(db: &DB, exercise: &str) -> Result<Vec<WeightSample>> {
    let rows = sqlx::query_as::<_, (String, f64, Option<i64>)>(
        r#"
        SELECT s.started_at, st.weight_kg, st.reps
        FROM sets st
        JOIN session_exercises se ON se.id = st.session_exercise_id
        JOIN sessions s ON s.id = se.session_id
        WHERE se.exercise_name = ?
          AND s.ended_at IS NOT NULL
          AND st.completed = 1
          AND st.weight_kg IS NOT NULL
        ORDER BY s.started_at ASC, st.set_number ASC
        "#,
    )
    .bind(exercise)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(started_at, weight_kg, reps)| WeightSample {
            date: started_at[..10].to_string(),
            weight_kg,
            reps,
        })
        .collect())
}

pub async fn cardio_samples(db: &DB, exercise: &str) -> Result<Vec<CardioSample>> {
    let rows = sqlx::query_as::<_, (String, Option<f64>, Option<f64>, Option<i64>)>(
        r#"
        SELECT s.started_at, cl.distance_km, cl.pace_sec_per_km, cl.duration_sec
        FROM cardio_logs cl
        JOIN session_exercises se ON se.id = cl.session_exercise_id
        JOIN sessions s ON s.id = se.session_id
        WHERE se.exercise_name = ? AND s.ended_at IS NOT NULL AND cl.distance_km IS NOT NULL
        ORDER BY s.started_at ASC
        "#,
    )
    .bind(exercise)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(started_at, distance_km, pace_sec_per_km, duration_sec)| CardioSample {
            date: started_at[..10].to_string(),
            distance_km,
            pace_sec_per_km,
            duration_sec,
        })
        .collect())
}

pub async fn metric_points(db: &DB, metric: &str) -> Result<Vec<MetricPoint>> {
    let rows = sqlx::query_as::<_, (String, f64, Option<String>)>(
        r#"
        SELECT s.started_at, cml.metric_value, cml.metric_unit
        FROM custom_metric_logs cml
        JOIN session_exercises se ON se.id = cml.session_exercise_id
        JOIN sessions s ON s.id = se.session_id
        WHERE cml.metric_name = ? AND s.ended_at IS NOT NULL AND cml.metric_value IS NOT NULL
        ORDER BY s.started_at ASC
        "#,
    )
    .bind(metric)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(started_at, value, unit)| MetricPoint {
            date: started_at[..10].to_string(),
            value,
            unit,
        })
        .collect())
}

pub async fn session_stamps(db: &DB) -> Result<Vec<SessionStamp>> {
    let rows =
        sqlx::query_as::<_, (String, bool)>("SELECT started_at, ended_at IS NOT NULL FROM sessions")
            .fetch_all(db)
            .await?;

    let mut stamps = Vec::with_capacity(rows.len());
    for (started_at, completed) in rows {
        stamps.push(SessionStamp {
            started_at: parse_timestamp(&started_at)?,
            completed,
        });
    }

    Ok(stamps)
}

pub async fn volume_sets(db: &DB, since: DateTime<Utc>) -> Result<Vec<VolumeSet>> {
    let rows = sqlx::query_as::<_, (Option<f64>, Option<i64>, bool, String)>(
        r#"
        SELECT st.weight_kg, st.reps, st.completed, s.started_at
        FROM sets st
        JOIN session_exercises se ON se.id = st.session_exercise_id
        JOIN sessions s ON s.id = se.session_id
        WHERE s.ended_at IS NOT NULL AND s.started_at >= ?
        "#,
    )
    .bind(since.format("%Y-%m-%d %H:%M:%S").to_string())
    .fetch_all(db)
    .await?;

    let mut sets = Vec::with_capacity(rows.len());
    for (weight_kg, reps, completed, started_at) in rows {
        sets.push(VolumeSet {
            weight_kg,
            reps,
            completed,
            started_at: parse_timestamp(&started_at)?,
        });
    }

    Ok(sets)
}

pub async fn personal_records(db: &DB) -> Result<Vec<PersonalRecord>> {
    let records = sqlx::query_as::<_, PersonalRecord>(
        r#"
        SELECT exercise_name, kind, best_weight_kg, best_reps, best_1rm_kg, best_distance_km,
               best_pace_sec_per_km, best_duration_sec, achieved_at, session_id, updated_at
        FROM personal_records
        ORDER BY kind, exercise_name
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(records)
}

/// Rebuild the personal-record table from the raw logs of completed
/// sessions. Records are cheap to recompute, so the whole table is
/// dropped and refilled in one transaction.
pub async fn refresh_personal_records(db: &DB) -> Result<()> {
    let names: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT se.exercise_name
        FROM session_exercises se
        JOIN sessions s ON s.id = se.session_id
        WHERE s.ended_at IS NOT NULL
        ORDER BY se.exercise_name
        "#,
    )
    .fetch_all(db)
    .await?;

    // Collect everything before the transaction so the single-connection
    // test pool never has to serve a read while the write lock is held.
    let mut gym_rows: Vec<(String, GymRecord)> = Vec::new();
    let mut cardio_rows: Vec<(String, CardioRecord)> = Vec::new();

    for name in &names {
        let sets = gym_set_entries(db, name).await?;
        if let Some(rec) = gym_record(&sets) {
            gym_rows.push((name.clone(), rec));
        }

        let logs = cardio_log_entries(db, name).await?;
        if let Some(rec) = cardio_record(&logs) {
            cardio_rows.push((name.clone(), rec));
        }
    }

    // Start a transaction.
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM personal_records")
        .execute(&mut *tx)
        .await?;

    for (name, rec) in &gym_rows {
        sqlx::query(
            r#"
            INSERT INTO personal_records
                (id, exercise_name, kind, best_weight_kg, best_reps, best_1rm_kg,
                 achieved_at, session_id, updated_at)
            VALUES (?, ?, 'gym', ?, ?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(rec.best_weight_kg)
        .bind(rec.best_reps)
        .bind(rec.best_1rm_kg)
        .bind(&rec.achieved_at)
        .bind(&rec.session_id)
        .execute(&mut *tx)
        .await?;
    }

    for (name, rec) in &cardio_rows {
        sqlx::query(
            r#"
            INSERT INTO personal_records
                (id, exercise_name, kind, best_distance_km, best_pace_sec_per_km,
                 best_duration_sec, achieved_at, session_id, updated_at)
            VALUES (?, ?, 'cardio', ?, ?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(rec.best_distance_km)
        .bind(rec.best_pace_sec_per_km)
        .bind(rec.best_duration_sec)
        .bind(&rec.achieved_at)
        .bind(&rec.session_id)
        .execute(&mut *tx)
        .await?;
    }

    // Commit the transaction.
    tx.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory;
    use crate::types::WorkoutType;

    async fn insert_session(db: &DB, id: &str, kind: &str, started_at: &str, ended: bool) {
        let ended_at = ended.then(|| started_at.replace("10:00:00", "11:00:00"));
        sqlx::query(
            "INSERT INTO sessions (id, name, kind, started_at, ended_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(format!("session {id}"))
        .bind(kind)
        .bind(started_at)
        .bind(ended_at)
        .execute(db)
        .await
        .unwrap();
    }

    async fn insert_exercise(db: &DB, id: &str, session_id: &str, name: &str, position: i64) {
        sqlx::query(
            "INSERT INTO session_exercises (id, session_id, exercise_name, position) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(session_id)
        .bind(name)
        .bind(position)
        .execute(db)
        .await
        .unwrap();
    }

    async fn insert_set(
        db: &DB,
        exercise_id: &str,
        set_number: i64,
        weight_kg: Option<f64>,
        reps: Option<i64>,
        completed: bool,
    ) {
        sqlx::query(
            "INSERT INTO sets (id, session_exercise_id, set_number, reps, weight_kg, completed) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(exercise_id)
        .bind(set_number)
        .bind(reps)
        .bind(weight_kg)
        .bind(completed)
        .execute(db)
        .await
        .unwrap();
    }

    async fn insert_cardio(
        db: &DB,
        exercise_id: &str,
        distance_km: Option<f64>,
        duration_sec: Option<i64>,
        pace: Option<f64>,
    ) {
        sqlx::query(
            "INSERT INTO cardio_logs (id, session_exercise_id, distance_km, duration_sec, pace_sec_per_km) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(exercise_id)
        .bind(distance_km)
        .bind(duration_sec)
        .bind(pace)
        .execute(db)
        .await
        .unwrap();
    }

    #[test]
    fn parse_timestamp_reads_sqlite_format() {
        let ts = parse_timestamp("2024-03-01 10:30:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T10:30:00+00:00");
        assert!(parse_timestamp("not a date").is_err());
    }

    #[tokio::test]
    async fn rebuild_produces_best_gym_marks() {
        let db = open_memory().await.unwrap();

        insert_session(&db, "s1", "gym", "2024-03-01 10:00:00", true).await;
        insert_exercise(&db, "e1", "s1", "Bench Press", 1).await;
        insert_set(&db, "e1", 1, Some(80.0), Some(10), true).await;

        insert_session(&db, "s2", "gym", "2024-03-02 10:00:00", true).await;
        insert_exercise(&db, "e2", "s2", "Bench Press", 1).await;
        insert_set(&db, "e2", 1, Some(100.0), Some(5), true).await;
        insert_set(&db, "e2", 2, Some(90.0), Some(8), true).await;

        refresh_personal_records(&db).await.unwrap();

        let records = personal_records(&db).await.unwrap();
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.exercise_name, "Bench Press");
        assert_eq!(rec.kind, WorkoutType::Gym);
        assert_eq!(rec.best_weight_kg, Some(100.0));
        assert_eq!(rec.best_reps, Some(5));
        assert_eq!(rec.best_1rm_kg, Some(116.7));
        assert_eq!(rec.achieved_at.as_deref(), Some("2024-03-02"));
        assert_eq!(rec.session_id.as_deref(), Some("s2"));
    }

    #[tokio::test]
    async fn rebuild_ignores_open_sessions_and_is_idempotent() {
        let db = open_memory().await.unwrap();

        insert_session(&db, "s1", "gym", "2024-03-01 10:00:00", true).await;
        insert_exercise(&db, "e1", "s1", "Squat", 1).await;
        insert_set(&db, "e1", 1, Some(100.0), Some(5), true).await;

        // Heavier set, but its session never completed.
        insert_session(&db, "s2", "gym", "2024-03-02 10:00:00", false).await;
        insert_exercise(&db, "e2", "s2", "Squat", 1).await;
        insert_set(&db, "e2", 1, Some(200.0), Some(1), true).await;

        refresh_personal_records(&db).await.unwrap();
        refresh_personal_records(&db).await.unwrap();

        let records = personal_records(&db).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].best_weight_kg, Some(100.0));
        assert_eq!(records[0].session_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn rebuild_covers_cardio_bests_independently() {
        let db = open_memory().await.unwrap();

        insert_session(&db, "s1", "cardio", "2024-03-01 10:00:00", true).await;
        insert_exercise(&db, "e1", "s1", "Run", 1).await;
        insert_cardio(&db, "e1", Some(5.0), Some(1500), Some(300.0)).await;

        insert_session(&db, "s2", "cardio", "2024-03-08 10:00:00", true).await;
        insert_exercise(&db, "e2", "s2", "Run", 1).await;
        insert_cardio(&db, "e2", Some(10.0), Some(3600), Some(360.0)).await;

        refresh_personal_records(&db).await.unwrap();

        let records = personal_records(&db).await.unwrap();
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.kind, WorkoutType::Cardio);
        assert_eq!(rec.best_distance_km, Some(10.0));
        assert_eq!(rec.best_pace_sec_per_km, Some(300.0));
        assert_eq!(rec.best_duration_sec, Some(3600));
        // The dated best follows the fastest pace, which the shorter run holds.
        assert_eq!(rec.achieved_at.as_deref(), Some("2024-03-01"));
        assert_eq!(rec.session_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn weight_samples_skip_incomplete_and_weightless_sets() {
        let db = open_memory().await.unwrap();

        insert_session(&db, "s1", "gym", "2024-03-01 10:00:00", true).await;
        insert_exercise(&db, "e1", "s1", "Deadlift", 1).await;
        insert_set(&db, "e1", 1, Some(140.0), Some(5), true).await;
        insert_set(&db, "e1", 2, Some(150.0), Some(3), false).await;
        insert_set(&db, "e1", 3, None, Some(10), true).await;

        let samples = weight_samples(&db, "Deadlift").await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].date, "2024-03-01");
        assert_eq!(samples[0].weight_kg, 140.0);
        assert_eq!(samples[0].reps, Some(5));
    }

    #[tokio::test]
    async fn session_by_ref_resolves_index_and_id() {
        let db = open_memory().await.unwrap();

        insert_session(&db, "old", "gym", "2024-03-01 10:00:00", true).await;
        insert_session(&db, "new", "gym", "2024-03-05 10:00:00", true).await;
        insert_session(&db, "open", "gym", "2024-03-06 10:00:00", false).await;

        let first = session_by_ref(&db, "1").await.unwrap().unwrap();
        assert_eq!(first.id, "new");

        let second = session_by_ref(&db, "2").await.unwrap().unwrap();
        assert_eq!(second.id, "old");

        let by_id = session_by_ref(&db, "old").await.unwrap().unwrap();
        assert_eq!(by_id.id, "old");

        // Open sessions are not part of the completed listing.
        assert!(session_by_ref(&db, "3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exercise_names_union_sessions_and_templates() {
        let db = open_memory().await.unwrap();

        insert_session(&db, "s1", "gym", "2024-03-01 10:00:00", true).await;
        insert_exercise(&db, "e1", "s1", "Bench Press", 1).await;

        sqlx::query("INSERT INTO templates (id, name, kind) VALUES ('t1', 'Pull Day', 'gym')")
            .execute(&db)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO template_items (id, template_id, position, exercise_name) VALUES ('ti1', 't1', 1, 'Barbell Row')",
        )
        .execute(&db)
        .await
        .unwrap();

        let names = exercise_names(&db).await.unwrap();
        assert_eq!(names, vec!["Barbell Row".to_string(), "Bench Press".to_string()]);
    }

    #[tokio::test]
    async fn volume_sets_filter_by_start_date() {
        let db = open_memory().await.unwrap();

        insert_session(&db, "s1", "gym", "2024-02-01 10:00:00", true).await;
        insert_exercise(&db, "e1", "s1", "Squat", 1).await;
        insert_set(&db, "e1", 1, Some(100.0), Some(5), true).await;

        insert_session(&db, "s2", "gym", "2024-03-01 10:00:00", true).await;
        insert_exercise(&db, "e2", "s2", "Squat", 1).await;
        insert_set(&db, "e2", 1, Some(120.0), Some(3), true).await;

        let since = parse_timestamp("2024-02-15 00:00:00").unwrap();
        let sets = volume_sets(&db, since).await.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].weight_kg, Some(120.0));
    }
}
