use anyhow::Result;
use chrono::{Duration, Utc};
use colored::Colorize;
use serde::Serialize;
use sqlx::Row;

use crate::{
    db::DB,
    metrics::duration::format_duration,
    metrics::summary::{DashboardSummary, dashboard_summary},
    storage,
    types::{OutputFmt, emit},
};

#[derive(Serialize)]
struct RecentSession {
    name: String,
    kind: String,
    started_at: String,
    duration_sec: i64,
}

#[derive(Serialize)]
struct TemplateLine {
    name: String,
    kind: String,
    exercises: i64,
}

#[derive(Serialize)]
struct Dashboard {
    summary: DashboardSummary,
    recent: Vec<RecentSession>,
    templates: Vec<TemplateLine>,
}

pub async fn handle(pool: &DB, fmt: OutputFmt) -> Result<()> {
    let now = Utc::now();

    let stamps = storage::session_stamps(pool).await?;
    let sets = storage::volume_sets(pool, now - Duration::days(7)).await?;
    let summary = dashboard_summary(now, &stamps, &sets);

    let recent: Vec<RecentSession> = sqlx::query(
        r#"
        SELECT name, kind, started_at,
               strftime('%s', ended_at) - strftime('%s', started_at) AS duration_sec
        FROM   sessions
        WHERE  ended_at IS NOT NULL
        ORDER  BY started_at DESC
        LIMIT  3
        "#,
    )
    .fetch_all(pool)
    .await?
    .iter()
    .map(|r| RecentSession {
        name: r.get("name"),
        kind: r.get("kind"),
        started_at: r.get("started_at"),
        duration_sec: r.get("duration_sec"),
    })
    .collect();

    let templates: Vec<TemplateLine> = sqlx::query(
        r#"
        SELECT name, kind,
               (SELECT COUNT(*) FROM template_items ti
                WHERE ti.template_id = t.id) AS exercises
        FROM   templates t
        ORDER  BY name
        LIMIT  3
        "#,
    )
    .fetch_all(pool)
    .await?
    .iter()
    .map(|r| TemplateLine {
        name: r.get("name"),
        kind: r.get("kind"),
        exercises: r.get("exercises"),
    })
    .collect();

    let active = storage::current_session(pool).await?;

    let payload = Dashboard {
        summary,
        recent,
        templates,
    };

    emit(fmt, &payload, || {
        println!("{}", "Dashboard".cyan().bold());

        if let Some(open) = &active {
            println!(
                "{} session `{}` is active – `session show` to resume",
                "info:".blue().bold(),
                open.name.bold()
            );
        }

        println!(
            " {} {}",
            "sessions this week:".bold(),
            payload.summary.sessions_this_week
        );
        println!(
            " {} {} kg",
            "weekly volume:".bold(),
            payload.summary.weekly_volume_kg
        );
        match payload.summary.last_workout {
            Some(ts) => {
                let ago = match (now - ts).num_days() {
                    0 => "today".to_string(),
                    1 => "yesterday".to_string(),
                    n => format!("{} days ago", n),
                };
                println!(
                    " {} {} ({})",
                    "last workout:".bold(),
                    ts.format("%Y-%m-%d"),
                    ago.dimmed()
                );
            }
            None => println!(" {} {}", "last workout:".bold(), "never".dimmed()),
        }

        if !payload.recent.is_empty() {
            println!("\n{}", "Recent sessions:".cyan().bold());
            for s in &payload.recent {
                println!(
                    " • {} ({})  {}  {}",
                    s.name.bold(),
                    s.kind.yellow(),
                    s.started_at[..16].dimmed(),
                    format_duration(s.duration_sec).dimmed()
                );
            }
        }

        if payload.templates.is_empty() {
            println!(
                "\n{}",
                "  (no templates yet – `template import` one)".dimmed()
            );
        } else {
            println!("\n{}", "Templates:".cyan().bold());
            for t in &payload.templates {
                println!(
                    " • {} ({})  {} exercises",
                    t.name.bold(),
                    t.kind.yellow(),
                    t.exercises
                );
            }
        }
    });

    Ok(())
}
