use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use colored::Colorize;

use crate::{
    cli::ProgressArgs,
    db::DB,
    metrics::duration::format_clock,
    metrics::history::{cardio_history, weight_history},
    metrics::pace::format_pace,
    storage,
    types::{OutputFmt, best_name_suggestion, emit},
};

fn create_ascii_graph(
    data: &[(DateTime<Utc>, f32)],
    width: usize,
    height: usize,
    title: &str,
) -> Vec<String> {
    if data.is_empty() {
        return vec!["no data to plot".to_string()];
    }

    let min_value = data.iter().map(|(_, v)| *v).fold(f32::INFINITY, f32::min);
    let max_value = data.iter().map(|(_, v)| *v).fold(f32::NEG_INFINITY, f32::max);
    let range = max_value - min_value;

    if range == 0.0 {
        return vec!["flat series, nothing to plot".to_string()];
    }

    let mut grid = vec![vec![' '; width]; height];

    for i in 0..data.len() {
        let (_, value) = data[i];
        let x = (i as f32 / (data.len() - 1) as f32 * (width - 1) as f32) as usize;
        let y = ((value - min_value) / range * (height - 1) as f32) as usize;
        // Row 0 is the top of the grid.
        let y = height - 1 - y;

        if y < height && x < width {
            grid[y][x] = '●';
        }

        // Interpolate a dotted line back to the previous point.
        if i > 0 {
            let prev_x = ((i - 1) as f32 / (data.len() - 1) as f32 * (width - 1) as f32) as usize;
            let prev_y = ((data[i - 1].1 - min_value) / range * (height - 1) as f32) as usize;
            let prev_y = height - 1 - prev_y;

            let dx = x as isize - prev_x as isize;
            let dy = y as isize - prev_y as isize;
            let steps = dx.abs().max(dy.abs());

            for step in 1..steps {
                let px = prev_x as isize + (dx * step / steps);
                let py = prev_y as isize + (dy * step / steps);

                if px >= 0 && px < width as isize && py >= 0 && py < height as isize {
                    let (px, py) = (px as usize, py as usize);
                    if grid[py][px] == ' ' {
                        grid[py][px] = '·';
                    }
                }
            }
        }
    }

    let mut result = Vec::new();
    let step = range / (height - 1) as f32;

    result.push(format!("\n{}", title.bold()));
    result.push("─".repeat(width + 9));

    for (i, row) in grid.iter().enumerate() {
        let value = min_value + step * (height - 1 - i) as f32;
        result.push(format!(
            "{:6.1} │{}",
            value,
            row.iter().collect::<String>()
        ));
    }

    result.push(format!("       └{}", "─".repeat(width)));

    if let (Some(first), Some(last)) = (data.first(), data.last()) {
        result.push(format!(
            "       {}  {}",
            first.0.format("%Y-%m-%d"),
            last.0.format("%Y-%m-%d")
        ));
    }

    result
}

fn graph_points(chart: &[(String, f64)]) -> Vec<(DateTime<Utc>, f32)> {
    chart
        .iter()
        .filter_map(|(date, value)| {
            let naive_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            let naive_datetime = naive_date.and_hms_opt(0, 0, 0)?;
            Some((naive_datetime.and_utc(), *value as f32))
        })
        .collect()
}

fn print_ascii_graph(chart: &[(String, f64)], title: &str) {
    let data = graph_points(chart);
    let (term_width, term_height) = term_size::dimensions().unwrap_or((80, 24));
    let width = (term_width / 2).min(60);
    let height = (term_height / 2).min(15);

    for line in create_ascii_graph(&data, width, height, title) {
        println!("{}", line);
    }
}

fn render_png(path: &str, chart: &[(String, f64)], title: &str) -> Result<()> {
    use plotters::prelude::*;

    let y_min = chart.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let y_max = chart.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min) * 0.1).max(1.0);
    let x_max = chart.len().saturating_sub(1).max(1) as f64;

    let area = BitMapBackend::new(path, (1024, 640)).into_drawing_area();
    area.fill(&WHITE)?;

    let dates: Vec<&str> = chart.iter().map(|(d, _)| d.as_str()).collect();
    let mut plot = ChartBuilder::on(&area)
        .margin(25)
        .caption(title, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max, (y_min - pad)..(y_max + pad))?;

    plot.configure_mesh()
        .x_label_formatter(&|x| {
            dates
                .get(x.round() as usize)
                .map(|d| d.to_string())
                .unwrap_or_default()
        })
        .draw()?;

    plot.draw_series(LineSeries::new(
        chart.iter().enumerate().map(|(i, (_, v))| (i as f64, *v)),
        &RGBColor(31, 119, 180),
    ))?;

    area.present()?;
    Ok(())
}

fn cutoff_date(weeks: u32) -> String {
    (Utc::now() - Duration::weeks(weeks as i64))
        .format("%Y-%m-%d")
        .to_string()
}

async fn suggest_exercise(pool: &DB, input: &str) -> Result<()> {
    let known = storage::exercise_names(pool).await?;
    if let Some(sug) = best_name_suggestion(input, &known) {
        println!("{} did you mean: `{}`?", "info:".blue().bold(), sug.green());
    }
    Ok(())
}

pub async fn handle(args: ProgressArgs, pool: &DB, fmt: OutputFmt) -> Result<()> {
    if args.cardio && args.metric {
        println!(
            "{} --cardio and --metric are mutually exclusive",
            "error:".red().bold()
        );
        return Ok(());
    }
    if args.name.trim().is_empty() {
        println!("{} name must not be empty", "error:".red().bold());
        return Ok(());
    }

    if args.metric {
        let mut points = storage::metric_points(pool, &args.name).await?;
        if args.weeks > 0 {
            let cutoff = cutoff_date(args.weeks);
            points.retain(|p| p.date.as_str() >= cutoff.as_str());
        }

        if points.is_empty() {
            println!(
                "{} no logs for metric `{}`",
                "error:".red().bold(),
                args.name
            );
            let known: Vec<String> = sqlx::query_scalar(
                "SELECT DISTINCT metric_name FROM custom_metric_logs ORDER BY metric_name",
            )
            .fetch_all(pool)
            .await?;
            if let Some(sug) = best_name_suggestion(&args.name, &known) {
                println!("{} did you mean: `{}`?", "info:".blue().bold(), sug.green());
            }
            return Ok(());
        }

        let chart: Vec<(String, f64)> =
            points.iter().map(|p| (p.date.clone(), p.value)).collect();
        let unit = points.iter().find_map(|p| p.unit.clone());
        let title = match &unit {
            Some(u) => format!("{} ({})", args.name, u),
            None => args.name.clone(),
        };

        if let Some(path) = &args.png {
            render_png(path, &chart, &title)?;
            println!("{} wrote {}", "ok:".green().bold(), path);
        }

        emit(fmt, &points, || {
            if args.graph {
                print_ascii_graph(&chart, &title);
                return;
            }
            println!("{} {}", "Progress:".cyan().bold(), title.bold());
            for p in &points {
                println!(
                    " {}  {} {}",
                    p.date.dimmed(),
                    p.value.to_string().yellow().bold(),
                    p.unit.as_deref().unwrap_or_default().dimmed()
                );
            }
        });

        return Ok(());
    }

    if args.cardio {
        let samples = storage::cardio_samples(pool, &args.name).await?;
        let mut points = cardio_history(&samples);
        if args.weeks > 0 {
            let cutoff = cutoff_date(args.weeks);
            points.retain(|p| p.date.as_str() >= cutoff.as_str());
        }

        if points.is_empty() {
            println!(
                "{} no cardio logs for `{}`",
                "error:".red().bold(),
                args.name
            );
            suggest_exercise(pool, &args.name).await?;
            return Ok(());
        }

        let chart: Vec<(String, f64)> = points
            .iter()
            .map(|p| (p.date.clone(), p.distance_km))
            .collect();
        let title = format!("{} – distance (km)", args.name);

        if let Some(path) = &args.png {
            render_png(path, &chart, &title)?;
            println!("{} wrote {}", "ok:".green().bold(), path);
        }

        emit(fmt, &points, || {
            if args.graph {
                print_ascii_graph(&chart, &title);
                return;
            }
            println!("{} {}", "Progress:".cyan().bold(), title.bold());
            for p in &points {
                let pace = p
                    .pace_sec_per_km
                    .map(format_pace)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    " {}  {} km  in {}  ({})",
                    p.date.dimmed(),
                    p.distance_km.to_string().yellow().bold(),
                    format_clock(p.duration_sec),
                    pace.green()
                );
            }
        });

        return Ok(());
    }

    let samples = storage::weight_samples(pool, &args.name).await?;
    let mut points = weight_history(&samples);
    if args.weeks > 0 {
        let cutoff = cutoff_date(args.weeks);
        points.retain(|p| p.date.as_str() >= cutoff.as_str());
    }

    if points.is_empty() {
        println!(
            "{} no strength logs for `{}`",
            "error:".red().bold(),
            args.name
        );
        suggest_exercise(pool, &args.name).await?;
        return Ok(());
    }

    let chart: Vec<(String, f64)> = points
        .iter()
        .map(|p| (p.date.clone(), p.weight_kg))
        .collect();
    let title = format!("{} – top set (kg)", args.name);

    if let Some(path) = &args.png {
        render_png(path, &chart, &title)?;
        println!("{} wrote {}", "ok:".green().bold(), path);
    }

    emit(fmt, &points, || {
        if args.graph {
            print_ascii_graph(&chart, &title);
            return;
        }
        println!("{} {}", "Progress:".cyan().bold(), title.bold());
        for p in &points {
            println!(
                " {}  {}kg × {}",
                p.date.dimmed(),
                p.weight_kg.to_string().yellow().bold(),
                p.reps
            );
        }
    });

    Ok(())
}
