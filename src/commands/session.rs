use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    cli::SessionCmd,
    db::DB,
    metrics::duration::{format_clock, format_duration, format_elapsed, parse_duration},
    metrics::pace::{calc_pace, format_pace},
    models::{CardioRow, CustomMetricRow, SetRow, TemplateItem},
    storage,
    types::{OutputFmt, WorkoutType, best_name_suggestion, emit},
};

#[derive(Serialize)]
struct ShowExercise {
    position: i64,
    name: String,
    sets: Vec<SetRow>,
    cardio: Option<CardioRow>,
    metrics: Vec<CustomMetricRow>,
}

#[derive(Serialize)]
struct ShowSession {
    id: String,
    name: String,
    kind: String,
    started_at: String,
    elapsed_sec: i64,
    notes: Option<String>,
    exercises: Vec<ShowExercise>,
}

fn item_targets(item: &TemplateItem) -> String {
    let mut parts = Vec::new();
    if let Some(s) = item.target_sets {
        match item.target_reps {
            Some(r) => parts.push(format!("{}×{}", s, r)),
            None => parts.push(format!("{} sets", s)),
        }
    }
    if let Some(w) = item.target_weight_kg {
        parts.push(format!("@ {}kg", w));
    }
    if let Some(d) = item.target_distance_km {
        parts.push(format!("{} km", d));
    }
    if let Some(t) = item.target_duration_sec {
        parts.push(format_duration(t));
    }
    if let Some(m) = &item.custom_metric_name {
        match &item.custom_metric_unit {
            Some(u) => parts.push(format!("tracks {} ({})", m, u)),
            None => parts.push(format!("tracks {}", m)),
        }
    }

    parts.join(" ")
}

fn print_set_line(set: &SetRow) {
    let mark = if set.completed {
        "✓".green().to_string()
    } else {
        "✗".dimmed().to_string()
    };
    let load = match set.weight_kg {
        Some(w) => format!("{}kg", w),
        None => "bw".to_string(),
    };
    let reps = set
        .reps
        .map(|r| format!(" × {}", r))
        .unwrap_or_default();
    println!("     {} • {}{} {}", set.set_number.to_string().yellow(), load, reps, mark);
}

fn print_cardio_line(log: &CardioRow) {
    let mut parts = Vec::new();
    if let Some(d) = log.distance_km {
        parts.push(format!("{} km", d));
    }
    if let Some(t) = log.duration_sec {
        parts.push(format!("in {}", format_clock(t)));
    }
    if let Some(p) = log.pace_sec_per_km {
        parts.push(format!("({})", format_pace(p)));
    }
    if parts.is_empty() {
        println!("     {}", "(no cardio logged yet)".dimmed());
    } else {
        println!("     {}", parts.join(" "));
    }
}

fn print_metric_line(metric: &CustomMetricRow) {
    let value = metric
        .metric_value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    let unit = metric.metric_unit.as_deref().unwrap_or_default();
    println!("     {}: {} {}", metric.metric_name, value.bold(), unit.dimmed());
}

pub async fn handle(cmd: SessionCmd, pool: &DB, fmt: OutputFmt) -> Result<()> {
    match cmd {
        SessionCmd::Start(args) => {
            // Refuse to start on top of an open session.
            if let Some(open) = storage::current_session(pool).await? {
                println!(
                    "{} there is already an active session (id: {})",
                    "error:".red().bold(),
                    open.id
                );
                return Ok(());
            }

            // Resolve the template, if one was requested.
            let template = match &args.template {
                Some(reference) => match storage::template_by_ref(pool, reference).await? {
                    Some(t) => Some(t),
                    None => {
                        println!(
                            "{} no template matching `{}`",
                            "error:".red().bold(),
                            reference
                        );
                        return Ok(());
                    }
                },
                None => None,
            };

            let kind = template.as_ref().map(|t| t.kind).unwrap_or(args.kind);
            let name = args
                .name
                .clone()
                .or_else(|| template.as_ref().map(|t| t.name.clone()))
                .unwrap_or_else(|| match kind {
                    WorkoutType::Gym => "Gym Session".to_string(),
                    WorkoutType::Cardio => "Cardio Session".to_string(),
                    WorkoutType::Custom => "Custom Session".to_string(),
                });

            let items = match &template {
                Some(t) => storage::template_items(pool, &t.id).await?,
                None => Vec::new(),
            };

            // Start a transaction.
            let mut tx = pool.begin().await?;

            let session_id = Uuid::new_v4().to_string();
            sqlx::query(
                r#"
                INSERT INTO sessions (id, template_id, name, kind, started_at, notes)
                VALUES (?, ?, ?, ?, datetime('now'), ?)
                "#,
            )
            .bind(&session_id)
            .bind(template.as_ref().map(|t| t.id.as_str()))
            .bind(&name)
            .bind(kind)
            .bind(args.notes.as_deref())
            .execute(&mut *tx)
            .await?;

            for item in &items {
                sqlx::query(
                    "INSERT INTO session_exercises (id, session_id, exercise_name, position) VALUES (?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&session_id)
                .bind(&item.exercise_name)
                .bind(item.position)
                .execute(&mut *tx)
                .await?;
            }

            // Commit the transaction.
            tx.commit().await?;

            println!(
                "{} session `{}` started (id: {})",
                "ok:".green().bold(),
                name.bold(),
                session_id
            );

            if !items.is_empty() {
                println!("\n{}", "Exercises:".cyan().bold());
                for item in &items {
                    let idx = item.position.to_string().yellow();
                    let targets = item_targets(item);
                    if targets.is_empty() {
                        println!(" {} • {}", idx, item.exercise_name.bold());
                    } else {
                        println!(
                            " {} • {} — {}",
                            idx,
                            item.exercise_name.bold(),
                            targets.dimmed()
                        );
                    }
                }
            }

            Ok(())
        }

        SessionCmd::Show => {
            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let elapsed_sec: i64 =
                sqlx::query_scalar("SELECT strftime('%s','now') - strftime('%s', ?)")
                    .bind(&session.started_at)
                    .fetch_one(pool)
                    .await?;

            let mut exercises = Vec::new();
            for ex in storage::session_exercises(pool, &session.id).await? {
                exercises.push(ShowExercise {
                    position: ex.position,
                    name: ex.exercise_name,
                    sets: storage::sets_for_exercise(pool, &ex.id).await?,
                    cardio: storage::cardio_for_exercise(pool, &ex.id).await?,
                    metrics: storage::metrics_for_exercise(pool, &ex.id).await?,
                });
            }

            let payload = ShowSession {
                id: session.id.clone(),
                name: session.name.clone(),
                kind: session.kind.to_string(),
                started_at: session.started_at.clone(),
                elapsed_sec,
                notes: session.notes.clone(),
                exercises,
            };

            emit(fmt, &payload, || {
                println!(
                    "{} {} ({}) — started {}, elapsed {}",
                    "Session:".cyan().bold(),
                    payload.name.bold(),
                    payload.kind.yellow(),
                    &payload.started_at[..16],
                    format_elapsed(payload.elapsed_sec)
                );
                if let Some(notes) = &payload.notes {
                    println!("{}", notes.dimmed());
                }

                if payload.exercises.is_empty() {
                    println!("{}", "  (no exercises yet – `session add` one)".dimmed());
                    return;
                }

                println!("\n{}", "Exercises:".cyan().bold());
                for (i, ex) in payload.exercises.iter().enumerate() {
                    println!(" {} • {}", format!("{}", i + 1).yellow(), ex.name.bold());
                    for set in &ex.sets {
                        print_set_line(set);
                    }
                    if let Some(cardio) = &ex.cardio {
                        print_cardio_line(cardio);
                    }
                    for metric in &ex.metrics {
                        print_metric_line(metric);
                    }
                }
            });

            Ok(())
        }

        SessionCmd::Add { exercise } => {
            if exercise.trim().is_empty() {
                println!("{} exercise name must not be empty", "error:".red().bold());
                return Ok(());
            }

            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            // A close-but-new name is usually a typo worth flagging.
            let known = storage::exercise_names(pool).await?;
            if !known.iter().any(|n| n == &exercise) {
                if let Some(sug) = best_name_suggestion(&exercise, &known) {
                    println!(
                        "{} new exercise `{}` -- did you mean: `{}`?",
                        "warning:".yellow().bold(),
                        exercise,
                        sug.green()
                    );
                }
            }

            let position: i64 = sqlx::query_scalar(
                "SELECT COALESCE(MAX(position), 0) + 1 FROM session_exercises WHERE session_id = ?",
            )
            .bind(&session.id)
            .fetch_one(pool)
            .await?;

            sqlx::query(
                "INSERT INTO session_exercises (id, session_id, exercise_name, position) VALUES (?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&session.id)
            .bind(&exercise)
            .bind(position)
            .execute(pool)
            .await?;

            println!(
                "{} added `{}` at position {}",
                "ok:".green().bold(),
                exercise.bold(),
                position
            );

            Ok(())
        }

        SessionCmd::Remove { exercise } => {
            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let Some(target) =
                storage::session_exercise_by_ref(pool, &session.id, &exercise).await?
            else {
                println!(
                    "{} no exercise matching `{}` in the current session",
                    "error:".red().bold(),
                    exercise
                );
                return Ok(());
            };

            // Cascade removes this exercise's sets and logs.
            sqlx::query("DELETE FROM session_exercises WHERE id = ?")
                .bind(&target.id)
                .execute(pool)
                .await?;

            println!(
                "{} removed `{}` and its logs",
                "ok:".green().bold(),
                target.exercise_name.bold()
            );

            Ok(())
        }

        SessionCmd::Set {
            exercise,
            weight,
            reps,
            set,
            skipped,
        } => {
            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            // "bw" means a bodyweight set with no load attached.
            let weight_kg: Option<f64> = if weight.eq_ignore_ascii_case("bw") {
                None
            } else {
                match weight.parse::<f64>() {
                    Ok(w) if w >= 0.0 => Some(w),
                    _ => {
                        println!("{} invalid weight `{}`", "error:".red().bold(), weight);
                        return Ok(());
                    }
                }
            };

            if reps < 0 {
                println!("{} reps must not be negative", "error:".red().bold());
                return Ok(());
            }

            let Some(target) =
                storage::session_exercise_by_ref(pool, &session.id, &exercise).await?
            else {
                println!(
                    "{} no exercise matching `{}` in the current session",
                    "error:".red().bold(),
                    exercise
                );
                return Ok(());
            };

            let set_number = match set {
                Some(n) if n >= 1 => n,
                Some(n) => {
                    println!("{} invalid set number {}", "error:".red().bold(), n);
                    return Ok(());
                }
                None => {
                    sqlx::query_scalar::<_, i64>(
                        "SELECT COALESCE(MAX(set_number), 0) + 1 FROM sets WHERE session_exercise_id = ?",
                    )
                    .bind(&target.id)
                    .fetch_one(pool)
                    .await?
                }
            };

            // Start a transaction.
            let mut tx = pool.begin().await?;

            let existing: Option<String> = sqlx::query_scalar(
                "SELECT id FROM sets WHERE session_exercise_id = ? AND set_number = ?",
            )
            .bind(&target.id)
            .bind(set_number)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(id) = existing {
                sqlx::query("UPDATE sets SET reps = ?, weight_kg = ?, completed = ? WHERE id = ?")
                    .bind(reps)
                    .bind(weight_kg)
                    .bind(!skipped)
                    .bind(&id)
                    .execute(&mut *tx)
                    .await?;
            } else {
                sqlx::query(
                    r#"
                    INSERT INTO sets (id, session_exercise_id, set_number, reps, weight_kg, completed, created_at)
                    VALUES (?, ?, ?, ?, ?, ?, datetime('now'))
                    "#,
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&target.id)
                .bind(set_number)
                .bind(reps)
                .bind(weight_kg)
                .bind(!skipped)
                .execute(&mut *tx)
                .await?;
            }

            // Commit the transaction.
            tx.commit().await?;

            let load = weight_kg
                .map(|w| format!("{}kg", w))
                .unwrap_or_else(|| "bw".to_string());
            let status = if skipped { " (skipped)" } else { "" };
            println!(
                "{} logged set {} for `{}` ({} × {}){}",
                "ok:".green().bold(),
                set_number,
                target.exercise_name.bold(),
                load,
                reps,
                status
            );

            Ok(())
        }

        SessionCmd::Cardio {
            exercise,
            distance,
            hours,
            mins,
            secs,
        } => {
            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            if let Some(d) = distance {
                if d <= 0.0 {
                    println!("{} distance must be positive", "error:".red().bold());
                    return Ok(());
                }
            }
            if hours < 0 || mins < 0 || secs < 0 {
                println!("{} duration parts must not be negative", "error:".red().bold());
                return Ok(());
            }

            let total = parse_duration(hours, mins, secs);
            let duration_sec = (total > 0).then_some(total);

            if distance.is_none() && duration_sec.is_none() {
                println!(
                    "{} nothing to log – give a distance and/or a duration",
                    "error:".red().bold()
                );
                return Ok(());
            }

            let Some(target) =
                storage::session_exercise_by_ref(pool, &session.id, &exercise).await?
            else {
                println!(
                    "{} no exercise matching `{}` in the current session",
                    "error:".red().bold(),
                    exercise
                );
                return Ok(());
            };

            // Pace is derived once here and stored with the log.
            let pace = distance
                .zip(duration_sec)
                .and_then(|(d, t)| calc_pace(d, t));

            sqlx::query(
                r#"
                INSERT INTO cardio_logs (id, session_exercise_id, distance_km, duration_sec, pace_sec_per_km)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(session_exercise_id) DO UPDATE SET
                    distance_km = excluded.distance_km,
                    duration_sec = excluded.duration_sec,
                    pace_sec_per_km = excluded.pace_sec_per_km
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&target.id)
            .bind(distance)
            .bind(duration_sec)
            .bind(pace)
            .execute(pool)
            .await?;

            let mut parts = Vec::new();
            if let Some(d) = distance {
                parts.push(format!("{} km", d));
            }
            if let Some(t) = duration_sec {
                parts.push(format!("in {}", format_clock(t)));
            }
            if let Some(p) = pace {
                parts.push(format!("({})", format_pace(p)));
            }
            println!(
                "{} logged cardio for `{}`: {}",
                "ok:".green().bold(),
                target.exercise_name.bold(),
                parts.join(" ")
            );

            Ok(())
        }

        SessionCmd::Metric {
            exercise,
            name,
            value,
            unit,
        } => {
            if name.trim().is_empty() {
                println!("{} metric name must not be empty", "error:".red().bold());
                return Ok(());
            }

            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let Some(target) =
                storage::session_exercise_by_ref(pool, &session.id, &exercise).await?
            else {
                println!(
                    "{} no exercise matching `{}` in the current session",
                    "error:".red().bold(),
                    exercise
                );
                return Ok(());
            };

            sqlx::query(
                r#"
                INSERT INTO custom_metric_logs (id, session_exercise_id, metric_name, metric_value, metric_unit)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(session_exercise_id, metric_name) DO UPDATE SET
                    metric_value = excluded.metric_value,
                    metric_unit = excluded.metric_unit
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&target.id)
            .bind(&name)
            .bind(value)
            .bind(unit.as_deref())
            .execute(pool)
            .await?;

            println!(
                "{} logged {} = {} {} for `{}`",
                "ok:".green().bold(),
                name,
                value.to_string().bold(),
                unit.as_deref().unwrap_or_default(),
                target.exercise_name.bold()
            );

            Ok(())
        }

        SessionCmd::Done => {
            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            // Start a transaction.
            let mut tx = pool.begin().await?;

            sqlx::query("UPDATE sessions SET ended_at = datetime('now') WHERE id = ?")
                .bind(&session.id)
                .execute(&mut *tx)
                .await?;

            // Commit the transaction.
            tx.commit().await?;

            // Completed logs are now part of history, so records can move.
            storage::refresh_personal_records(pool).await?;

            let duration_sec: i64 = sqlx::query_scalar(
                "SELECT strftime('%s', ended_at) - strftime('%s', started_at) FROM sessions WHERE id = ?",
            )
            .bind(&session.id)
            .fetch_one(pool)
            .await?;

            println!(
                "{} session completed (id: {})",
                "ok:".green().bold(),
                session.id
            );
            println!(
                "{} {} — {} (duration: {})",
                "Session:".cyan().bold(),
                session.name.bold(),
                &session.started_at[..16],
                format_duration(duration_sec)
            );

            let exercises = storage::session_exercises(pool, &session.id).await?;
            if !exercises.is_empty() {
                println!("\n{}", "Exercises:".cyan().bold());
                for ex in &exercises {
                    println!("• {}", ex.exercise_name.bold());
                    for set in storage::sets_for_exercise(pool, &ex.id).await? {
                        print_set_line(&set);
                    }
                    if let Some(cardio) = storage::cardio_for_exercise(pool, &ex.id).await? {
                        print_cardio_line(&cardio);
                    }
                    for metric in storage::metrics_for_exercise(pool, &ex.id).await? {
                        print_metric_line(&metric);
                    }
                }
            }

            println!("\n{} personal records refreshed", "info:".blue().bold());

            Ok(())
        }

        SessionCmd::Cancel => {
            let Some(session) = storage::current_session(pool).await? else {
                println!("{} no active session to cancel", "error:".red().bold());
                return Ok(());
            };

            // Start a transaction.
            let mut tx = pool.begin().await?;

            // Delete the session (cascade will handle exercises and logs).
            sqlx::query("DELETE FROM sessions WHERE id = ?")
                .bind(&session.id)
                .execute(&mut *tx)
                .await?;

            // Commit the transaction.
            tx.commit().await?;

            println!(
                "{} session cancelled (id: {})",
                "ok:".green().bold(),
                session.id
            );

            Ok(())
        }

        SessionCmd::Delete { session } => {
            let Some(target) = storage::session_by_ref(pool, &session).await? else {
                println!(
                    "{} no completed session matching `{}`",
                    "error:".red().bold(),
                    session
                );
                return Ok(());
            };

            if target.ended_at.is_none() {
                println!(
                    "{} session {} is still active – use `session cancel`",
                    "error:".red().bold(),
                    target.id
                );
                return Ok(());
            }

            // Start a transaction.
            let mut tx = pool.begin().await?;

            sqlx::query("DELETE FROM sessions WHERE id = ?")
                .bind(&target.id)
                .execute(&mut *tx)
                .await?;

            // Commit the transaction.
            tx.commit().await?;

            println!(
                "{} deleted session `{}` from {}",
                "ok:".green().bold(),
                target.name.bold(),
                &target.started_at[..10]
            );

            Ok(())
        }
    }
}
