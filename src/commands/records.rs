use anyhow::Result;
use colored::Colorize;

use crate::{
    db::DB,
    metrics::duration::format_clock,
    metrics::pace::format_pace,
    models::PersonalRecord,
    storage,
    types::{OutputFmt, WorkoutType, emit},
};

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

fn print_columns(left: Vec<String>, right: Vec<String>) {
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

fn achieved_col(r: &PersonalRecord) -> String {
    match r.achieved_at.as_deref() {
        Some(d) => format!("on {}", &d[..10]).dimmed().to_string(),
        None => String::new(),
    }
}

pub async fn handle(pool: &DB, fmt: OutputFmt) -> Result<()> {
    let records = storage::personal_records(pool).await?;

    emit(fmt, &records, || {
        if records.is_empty() {
            println!(
                "{}",
                "  (no records yet – complete a session first)".dimmed()
            );
            return;
        }

        let strength: Vec<&PersonalRecord> = records
            .iter()
            .filter(|r| r.kind == WorkoutType::Gym)
            .collect();
        let cardio: Vec<&PersonalRecord> = records
            .iter()
            .filter(|r| r.kind == WorkoutType::Cardio)
            .collect();

        if !strength.is_empty() {
            println!("{}", "Strength records:".cyan().bold());

            let mut left = Vec::<String>::new();
            let mut right = Vec::<String>::new();
            for r in &strength {
                let weight = r
                    .best_weight_kg
                    .map(|w| format!("{}kg", w))
                    .unwrap_or_else(|| "-".to_string());
                let reps = r
                    .best_reps
                    .map(|n| format!("{} reps", n))
                    .unwrap_or_else(|| "-".to_string());
                let onerm = r
                    .best_1rm_kg
                    .map(|e| format!("{:.1}kg e1RM", e))
                    .unwrap_or_else(|| "-".to_string());
                left.push(format!(
                    " • {}  {}  {}  {}",
                    r.exercise_name.bold(),
                    weight.yellow(),
                    reps,
                    onerm.green()
                ));
                right.push(achieved_col(r));
            }
            print_columns(left, right);
        }

        if !cardio.is_empty() {
            if !strength.is_empty() {
                println!();
            }
            println!("{}", "Cardio records:".cyan().bold());

            let mut left = Vec::<String>::new();
            let mut right = Vec::<String>::new();
            for r in &cardio {
                let distance = r
                    .best_distance_km
                    .map(|d| format!("{} km", d))
                    .unwrap_or_else(|| "-".to_string());
                let pace = r
                    .best_pace_sec_per_km
                    .map(format_pace)
                    .unwrap_or_else(|| "-".to_string());
                let duration = r
                    .best_duration_sec
                    .map(format_clock)
                    .unwrap_or_else(|| "-".to_string());
                left.push(format!(
                    " • {}  {}  {}  {}",
                    r.exercise_name.bold(),
                    distance.yellow(),
                    pace.green(),
                    duration
                ));
                right.push(achieved_col(r));
            }
            print_columns(left, right);
        }
    });

    Ok(())
}
