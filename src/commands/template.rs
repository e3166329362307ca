use std::{collections::HashMap, fs::read_to_string};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    cli::TemplateCmd,
    db::DB,
    metrics::duration::format_duration,
    models::TemplateItem,
    storage,
    types::{OutputFmt, WorkoutType, emit},
};

#[derive(Debug, Deserialize)]
struct TemplateToml {
    name: String,
    kind: Option<WorkoutType>,
    notes: Option<String>,
    #[serde(rename = "exercise", default)]
    exercises: Vec<TemplateExerciseToml>,
}

#[derive(Debug, Deserialize)]
struct TemplateExerciseToml {
    name: String,
    sets: Option<i64>,
    reps: Option<i64>,
    weight: Option<f64>,
    distance: Option<f64>,
    duration_mins: Option<i64>,
    metric: Option<String>,
    unit: Option<String>,
}

#[derive(Serialize)]
struct TplJson {
    idx: i64,
    name: String,
    kind: String,
    notes: String,
    created_at: String,
    exercises: i64,
}

#[derive(Serialize)]
struct TplShow {
    id: String,
    name: String,
    kind: String,
    notes: Option<String>,
    created_at: String,
    items: Vec<TemplateItem>,
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

async fn items_by_template(pool: &DB) -> Result<HashMap<String, Vec<TemplateItem>>> {
    let rows = sqlx::query(
        r#"
        SELECT template_id, position, exercise_name,
               target_sets, target_reps, target_weight_kg,
               target_distance_km, target_duration_sec,
               custom_metric_name, custom_metric_unit
        FROM   template_items
        ORDER  BY template_id, position
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<String, Vec<TemplateItem>> = HashMap::new();
    for r in rows {
        map.entry(r.get::<String, _>("template_id"))
            .or_default()
            .push(TemplateItem {
                position: r.get("position"),
                exercise_name: r.get("exercise_name"),
                target_sets: r.get("target_sets"),
                target_reps: r.get("target_reps"),
                target_weight_kg: r.get("target_weight_kg"),
                target_distance_km: r.get("target_distance_km"),
                target_duration_sec: r.get("target_duration_sec"),
                custom_metric_name: r.get("custom_metric_name"),
                custom_metric_unit: r.get("custom_metric_unit"),
            });
    }
    Ok(map)
}

fn pretty_print(
    tpls: &[TplJson],
    item_map: &HashMap<String, Vec<TemplateItem>>,
    idx2id: &HashMap<i64, String>,
) {
    if tpls.is_empty() {
        println!("{}", "  (no templates found)".dimmed());
        return;
    }

    println!("{}", "Templates:".cyan().bold());

    let idx_w = tpls
        .iter()
        .map(|t| t.idx.to_string().len())
        .max()
        .unwrap_or(1);
    let mut left = Vec::<String>::new();
    let mut right = Vec::<String>::new();

    for t in tpls {
        //
        // Template row.
        //
        let idx = format!("{:>width$}", t.idx, width = idx_w).yellow();
        let notes = if t.notes.is_empty() {
            String::new()
        } else {
            format!("– {}", t.notes).dimmed().to_string()
        };
        left.push(format!(
            " {} • {} ({}) {}",
            idx,
            t.name.bold(),
            t.kind.yellow(),
            notes
        ));
        right.push(
            format!("added {}", &t.created_at[..10])
                .dimmed()
                .to_string(),
        );

        //
        // Exercise rows
        //
        if let Some(id) = idx2id.get(&t.idx) {
            if let Some(items) = item_map.get(id) {
                for (i, item) in items.iter().enumerate() {
                    let connector = if i + 1 == items.len() {
                        "└─"
                    } else {
                        "├─"
                    };
                    let targets = item_targets(item);
                    left.push(format!(
                        " {}   {} {} {}",
                        " ".repeat(idx_w),
                        connector,
                        item.exercise_name.bold(),
                        targets.dimmed()
                    ));
                    right.push(String::new());
                }
            }
        }
    }

    let pad_plain = left.iter().map(|s| plain_len(s)).max().unwrap_or(0);
    for (l, r) in left.into_iter().zip(right) {
        let pad = pad_plain + (l.len() - plain_len(&l));
        if r.is_empty() {
            println!("{}", l);
        } else {
            println!("{:<pad$} {} {}", l, "|".blue(), r, pad = pad);
        }
    }
}

pub async fn handle(cmd: TemplateCmd, pool: &DB, fmt: OutputFmt) -> Result<()> {
    match cmd {
        TemplateCmd::Import { files } => {
            if files.is_empty() {
                println!("{} no template file provided", "warning:".yellow().bold());
            }
            for f in files {
                match import_single_template(pool, &f).await {
                    Ok(()) => {}
                    Err(e) => {
                        if let Some(io_err) = e.downcast_ref::<std::io::Error>() {
                            if io_err.kind() == std::io::ErrorKind::NotFound {
                                println!(
                                    "{} cannot open file `{}` – file not found",
                                    "error:".red().bold(),
                                    f
                                );
                                continue;
                            }
                        }
                        println!("{} failed to import `{}`: {:#}", "error:".red().bold(), f, e);
                    }
                }
            }
        }

        TemplateCmd::List => {
            let rows = sqlx::query(
                r#"
                SELECT ROW_NUMBER() OVER (ORDER BY name) AS idx,
                       id, name, kind,
                       COALESCE(notes,'') AS notes,
                       created_at
                FROM   templates
                ORDER  BY idx
                "#,
            )
            .fetch_all(pool)
            .await?;

            let mut tpls = Vec::<TplJson>::new();
            let mut idx2id = HashMap::<i64, String>::new();
            for r in &rows {
                let idx: i64 = r.get("idx");
                tpls.push(TplJson {
                    idx,
                    name: r.get("name"),
                    kind: r.get("kind"),
                    notes: r.get("notes"),
                    created_at: r.get("created_at"),
                    exercises: 0,
                });
                idx2id.insert(idx, r.get("id"));
            }

            let item_map = items_by_template(pool).await?;
            for t in &mut tpls {
                if let Some(id) = idx2id.get(&t.idx) {
                    t.exercises = item_map.get(id).map(|v| v.len() as i64).unwrap_or(0);
                }
            }

            emit(fmt, &tpls, || pretty_print(&tpls, &item_map, &idx2id));
        }

        TemplateCmd::Show { template } => {
            let Some(tpl) = storage::template_by_ref(pool, &template).await? else {
                println!(
                    "{} no template matching `{}`",
                    "error:".red().bold(),
                    template
                );
                return Ok(());
            };

            let items = storage::template_items(pool, &tpl.id).await?;
            let payload = TplShow {
                id: tpl.id.clone(),
                name: tpl.name.clone(),
                kind: tpl.kind.to_string(),
                notes: tpl.notes.clone(),
                created_at: tpl.created_at.clone(),
                items,
            };

            emit(fmt, &payload, || {
                println!(
                    "{} {} ({}) — added {}",
                    "Template:".cyan().bold(),
                    payload.name.bold(),
                    payload.kind.yellow(),
                    &payload.created_at[..10]
                );
                if let Some(notes) = &payload.notes {
                    println!("{}", notes.dimmed());
                }

                if payload.items.is_empty() {
                    println!("{}", "  (no exercises)".dimmed());
                    return;
                }

                println!("\n{}", "Exercises:".cyan().bold());
                for item in &payload.items {
                    let targets = item_targets(item);
                    if targets.is_empty() {
                        println!(
                            " {} • {}",
                            item.position.to_string().yellow(),
                            item.exercise_name.bold()
                        );
                    } else {
                        println!(
                            " {} • {} — {}",
                            item.position.to_string().yellow(),
                            item.exercise_name.bold(),
                            targets.dimmed()
                        );
                    }
                }
            });
        }

        TemplateCmd::Delete { template } => {
            let Some(tpl) = storage::template_by_ref(pool, &template).await? else {
                println!(
                    "{} no template matching `{}`",
                    "error:".red().bold(),
                    template
                );
                return Ok(());
            };

            // Cascade removes the template's items; past sessions keep
            // their copied exercises.
            sqlx::query("DELETE FROM templates WHERE id = ?")
                .bind(&tpl.id)
                .execute(pool)
                .await?;

            println!("{} deleted template `{}`", "ok:".green().bold(), tpl.name.bold());
        }
    }
    Ok(())
}

async fn import_single_template(pool: &DB, file: &str) -> Result<()> {
    let toml_str = read_to_string(file).with_context(|| format!("reading `{file}`"))?;
    let tpl: TemplateToml =
        toml::from_str(&toml_str).with_context(|| format!("parsing `{file}`"))?;

    if tpl.name.trim().is_empty() {
        println!(
            "{} template in `{}` has no name – skipping",
            "warning:".yellow().bold(),
            file
        );
        return Ok(());
    }
    if tpl.exercises.is_empty() {
        println!(
            "{} template `{}` has no exercises – skipping",
            "warning:".yellow().bold(),
            tpl.name
        );
        return Ok(());
    }
    for ex in &tpl.exercises {
        if ex.name.trim().is_empty() {
            println!(
                "{} template `{}` has an unnamed exercise – skipping",
                "warning:".yellow().bold(),
                tpl.name
            );
            return Ok(());
        }
        let negative = ex.sets.is_some_and(|v| v < 0)
            || ex.reps.is_some_and(|v| v < 0)
            || ex.weight.is_some_and(|v| v < 0.0)
            || ex.distance.is_some_and(|v| v < 0.0)
            || ex.duration_mins.is_some_and(|v| v < 0);
        if negative {
            println!(
                "{} template `{}` has negative targets on `{}` – skipping",
                "warning:".yellow().bold(),
                tpl.name,
                ex.name
            );
            return Ok(());
        }
    }

    let kind = tpl.kind.unwrap_or(WorkoutType::Gym);

    // Transactional import: re-importing a name replaces its exercises.
    let mut tx = pool.begin().await?;

    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM templates WHERE name = ?")
        .bind(&tpl.name)
        .fetch_optional(&mut *tx)
        .await?;

    let replaced = existing.is_some();
    let template_id = match existing {
        Some(id) => {
            sqlx::query("UPDATE templates SET kind = ?, notes = ? WHERE id = ?")
                .bind(kind)
                .bind(tpl.notes.as_deref())
                .bind(&id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM template_items WHERE template_id = ?")
                .bind(&id)
                .execute(&mut *tx)
                .await?;
            id
        }
        None => {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                r#"INSERT INTO templates (id,name,kind,notes,created_at)
                       VALUES (?1,?2,?3,?4,datetime('now'))"#,
            )
            .bind(&id)
            .bind(&tpl.name)
            .bind(kind)
            .bind(tpl.notes.as_deref())
            .execute(&mut *tx)
            .await?;
            id
        }
    };

    for (i, ex) in tpl.exercises.iter().enumerate() {
        sqlx::query(
            r#"INSERT INTO template_items
                   (id, template_id, position, exercise_name,
                    target_sets, target_reps, target_weight_kg,
                    target_distance_km, target_duration_sec,
                    custom_metric_name, custom_metric_unit)
               VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&template_id)
        .bind((i + 1) as i64)
        .bind(&ex.name)
        .bind(ex.sets)
        .bind(ex.reps)
        .bind(ex.weight)
        .bind(ex.distance)
        .bind(ex.duration_mins.map(|m| m * 60))
        .bind(ex.metric.as_deref())
        .bind(ex.unit.as_deref())
        .execute(&mut *tx)
        .await?;
    }

    // Commit the transaction.
    tx.commit().await?;

    if replaced {
        println!(
            "{} imported template `{}` ({} exercises, replaced)",
            "ok:".green().bold(),
            tpl.name.bold(),
            tpl.exercises.len()
        );
    } else {
        println!(
            "{} imported template `{}` ({} exercises)",
            "ok:".green().bold(),
            tpl.name.bold(),
            tpl.exercises.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ferrum-tpl-{}.toml", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn import_creates_template_with_items() {
        let db = open_memory().await.unwrap();
        let path = write_temp(
            r#"
            name = "Push Day"
            kind = "gym"
            notes = "chest focus"

            [[exercise]]
            name = "Bench Press"
            sets = 4
            reps = 8
            weight = 80.0

            [[exercise]]
            name = "Treadmill"
            distance = 5.0
            duration_mins = 40
            "#,
        );

        import_single_template(&db, path.to_str().unwrap())
            .await
            .unwrap();

        let id: String = sqlx::query_scalar("SELECT id FROM templates WHERE name = 'Push Day'")
            .fetch_one(&db)
            .await
            .unwrap();
        let items = storage::template_items(&db, &id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].exercise_name, "Bench Press");
        assert_eq!(items[0].target_sets, Some(4));
        assert_eq!(items[0].target_weight_kg, Some(80.0));
        // duration_mins is stored in seconds.
        assert_eq!(items[1].target_duration_sec, Some(2400));
        assert_eq!(items[1].target_distance_km, Some(5.0));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn reimport_replaces_items_by_name() {
        let db = open_memory().await.unwrap();

        let first = write_temp(
            "name = \"Legs\"\n[[exercise]]\nname = \"Squat\"\nsets = 5\n",
        );
        import_single_template(&db, first.to_str().unwrap())
            .await
            .unwrap();

        let second = write_temp(
            "name = \"Legs\"\n[[exercise]]\nname = \"Front Squat\"\n[[exercise]]\nname = \"Leg Press\"\n",
        );
        import_single_template(&db, second.to_str().unwrap())
            .await
            .unwrap();

        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(n, 1);

        let id: String = sqlx::query_scalar("SELECT id FROM templates WHERE name = 'Legs'")
            .fetch_one(&db)
            .await
            .unwrap();
        let items = storage::template_items(&db, &id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].exercise_name, "Front Squat");
        assert_eq!(items[1].exercise_name, "Leg Press");

        std::fs::remove_file(&first).unwrap();
        std::fs::remove_file(&second).unwrap();
    }

    #[tokio::test]
    async fn import_rejects_templates_without_exercises() {
        let db = open_memory().await.unwrap();
        let path = write_temp("name = \"Empty\"\n");

        import_single_template(&db, path.to_str().unwrap())
            .await
            .unwrap();

        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(n, 0);

        std::fs::remove_file(&path).unwrap();
    }
}
