use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::types::WorkoutType;

/// A single training session with its timing data.
/// The open session (if any) is the one row with `ended_at = None`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Session {
    pub id: String,
    pub template_id: Option<String>,
    pub name: String,
    pub kind: WorkoutType,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub notes: Option<String>,
}

/// One exercise slot inside a session, ordered by `position`.
/// Sets, cardio and custom-metric logs hang off this row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionExercise {
    pub id: String,
    pub exercise_name: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SetRow {
    pub id: String,
    pub set_number: i64,
    pub reps: Option<i64>,
    pub weight_kg: Option<f64>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CardioRow {
    pub distance_km: Option<f64>,
    pub duration_sec: Option<i64>,
    pub pace_sec_per_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomMetricRow {
    pub metric_name: String,
    pub metric_value: Option<f64>,
    pub metric_unit: Option<String>,
}

/// A reusable workout blueprint imported from TOML.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub kind: WorkoutType,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Planned exercise inside a template, with optional targets.
/// Which targets apply depends on the template kind.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TemplateItem {
    pub position: i64,
    pub exercise_name: String,
    pub target_sets: Option<i64>,
    pub target_reps: Option<i64>,
    pub target_weight_kg: Option<f64>,
    pub target_distance_km: Option<f64>,
    pub target_duration_sec: Option<i64>,
    pub custom_metric_name: Option<String>,
    pub custom_metric_unit: Option<String>,
}

/// All-time best marks for one exercise, one row per (exercise, kind).
/// Rebuilt from raw logs whenever a session completes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub kind: WorkoutType,
    pub best_weight_kg: Option<f64>,
    pub best_reps: Option<i64>,
    pub best_1rm_kg: Option<f64>,
    pub best_distance_km: Option<f64>,
    pub best_pace_sec_per_km: Option<f64>,
    pub best_duration_sec: Option<i64>,
    pub achieved_at: Option<String>,
    pub session_id: Option<String>,
    pub updated_at: String,
}
