use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sqlx::Row;

use crate::{
    cli::HistoryCmd,
    db::DB,
    metrics::duration::{format_clock, format_duration},
    metrics::pace::format_pace,
    models::{CardioRow, CustomMetricRow, SetRow},
    storage,
    types::{OutputFmt, emit},
};

#[derive(Serialize)]
struct HistJson {
    idx: i64,
    id: String,
    name: String,
    kind: String,
    started_at: String,
    duration_sec: i64,
    exercises: i64,
}

#[derive(Serialize)]
struct HistExercise {
    position: i64,
    name: String,
    sets: Vec<SetRow>,
    cardio: Option<CardioRow>,
    metrics: Vec<CustomMetricRow>,
}

#[derive(Serialize)]
struct HistDetail {
    id: String,
    name: String,
    kind: String,
    started_at: String,
    ended_at: Option<String>,
    duration_sec: i64,
    notes: Option<String>,
    exercises: Vec<HistExercise>,
}

fn plain_len(s: &str) -> usize {
    let mut n = 0;
    let mut esc = false;
    for b in s.bytes() {
        match (esc, b) {
            (true, b'm') => esc = false,
            (true, _) => {}
            (false, 0x1B) => esc = true,
            (false, _) => n += 1,
        }
    }
    n
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
    if !parts.is_empty() {
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

pub async fn handle(cmd: HistoryCmd, pool: &DB, fmt: OutputFmt) -> Result<()> {
    match cmd {
        HistoryCmd::List { limit, kind } => {
            if limit <= 0 {
                println!("{} limit must be positive", "error:".red().bold());
                return Ok(());
            }

            let mut sql = String::from(
                r#"
                SELECT ROW_NUMBER() OVER (ORDER BY started_at DESC) AS idx,
                       id, name, kind, started_at,
                       strftime('%s', ended_at) - strftime('%s', started_at) AS duration_sec,
                       (SELECT COUNT(*) FROM session_exercises se
                        WHERE se.session_id = s.id) AS exercises
                FROM   sessions s
                WHERE  ended_at IS NOT NULL
                "#,
            );
            if kind.is_some() {
                sql.push_str("AND kind = ? ");
            }
            sql.push_str("ORDER BY idx LIMIT ?");

            let mut q = sqlx::query(&sql);
            if let Some(k) = kind {
                q = q.bind(k);
            }
            let rows = q.bind(limit).fetch_all(pool).await?;

            let sessions: Vec<HistJson> = rows
                .iter()
                .map(|r| HistJson {
                    idx: r.get("idx"),
                    id: r.get("id"),
                    name: r.get("name"),
                    kind: r.get("kind"),
                    started_at: r.get("started_at"),
                    duration_sec: r.get("duration_sec"),
                    exercises: r.get("exercises"),
                })
                .collect();

            emit(fmt, &sessions, || {
                if sessions.is_empty() {
                    println!("{}", "  (no completed sessions yet)".dimmed());
                    return;
                }

                println!("{}", "History:".cyan().bold());

                let idx_w = sessions
                    .iter()
                    .map(|s| s.idx.to_string().len())
                    .max()
                    .unwrap_or(1);
                let mut left = Vec::<String>::new();
                let mut right = Vec::<String>::new();
                for s in &sessions {
                    let idx = format!("{:>width$}", s.idx, width = idx_w).yellow();
                    left.push(format!(" {} • {} ({})", idx, s.name.bold(), s.kind.yellow()));
                    right.push(
                        format!(
                            "{}  {}  {} exercises",
                            &s.started_at[..16],
                            format_duration(s.duration_sec),
                            s.exercises
                        )
                        .dimmed()
                        .to_string(),
                    );
                }

                let pad_plain = left.iter().map(|s| plain_len(s)).max().unwrap_or(0);
                for (l, r) in left.into_iter().zip(right) {
                    let pad = pad_plain + (l.len() - plain_len(&l));
                    println!("{:<pad$} {} {}", l, "|".blue(), r, pad = pad);
                }
            });
        }

        HistoryCmd::Show { session } => {
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
                    "{} session {} is still active – use `session show`",
                    "info:".blue().bold(),
                    target.id
                );
                return Ok(());
            }

            let duration_sec: i64 = sqlx::query_scalar(
                "SELECT strftime('%s', ended_at) - strftime('%s', started_at) FROM sessions WHERE id = ?",
            )
            .bind(&target.id)
            .fetch_one(pool)
            .await?;

            let mut exercises = Vec::new();
            for ex in storage::session_exercises(pool, &target.id).await? {
                exercises.push(HistExercise {
                    position: ex.position,
                    name: ex.exercise_name,
                    sets: storage::sets_for_exercise(pool, &ex.id).await?,
                    cardio: storage::cardio_for_exercise(pool, &ex.id).await?,
                    metrics: storage::metrics_for_exercise(pool, &ex.id).await?,
                });
            }

            let payload = HistDetail {
                id: target.id.clone(),
                name: target.name.clone(),
                kind: target.kind.to_string(),
                started_at: target.started_at.clone(),
                ended_at: target.ended_at.clone(),
                duration_sec,
                notes: target.notes.clone(),
                exercises,
            };

            emit(fmt, &payload, || {
                println!(
                    "{} {} ({}) — {} (duration: {})",
                    "Session:".cyan().bold(),
                    payload.name.bold(),
                    payload.kind.yellow(),
                    &payload.started_at[..16],
                    format_duration(payload.duration_sec)
                );
                if let Some(notes) = &payload.notes {
                    println!("{}", notes.dimmed());
                }

                if payload.exercises.is_empty() {
                    println!("{}", "  (no exercises logged)".dimmed());
                    return;
                }

                println!("\n{}", "Exercises:".cyan().bold());
                for ex in &payload.exercises {
                    println!(" {} • {}", ex.position.to_string().yellow(), ex.name.bold());
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
        }
    }
    Ok(())
}
