use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Start time and completion state of one session.
#[derive(Debug, Clone)]
pub struct SessionStamp {
    pub started_at: DateTime<Utc>,
    pub completed: bool,
}

/// One set joined with its session's start time.
#[derive(Debug, Clone)]
pub struct VolumeSet {
    pub weight_kg: Option<f64>,
    pub reps: Option<i64>,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub sessions_this_week: i64,
    pub weekly_volume_kg: i64,
    pub last_workout: Option<DateTime<Utc>>,
}

/// Weekly training stats over the rolling `[now - 7 days, now]` window.
/// `now` is injected so the result is a pure function of its arguments.
///
/// Volume sums `weight * reps` over completed sets of sessions started in
/// the window, treating missing values as zero, and rounds once at the end.
/// `last_workout` looks at all completed sessions, not just the window.
pub fn dashboard_summary(
    now: DateTime<Utc>,
    sessions: &[SessionStamp],
    sets: &[VolumeSet],
) -> DashboardSummary {
    let week_ago = now - Duration::days(7);

    let sessions_this_week = sessions
        .iter()
        .filter(|s| s.completed && s.started_at >= week_ago)
        .count() as i64;

    let volume: f64 = sets
        .iter()
        .filter(|s| s.completed && s.started_at >= week_ago)
        .map(|s| s.weight_kg.unwrap_or(0.0) * s.reps.unwrap_or(0) as f64)
        .sum();

    let last_workout = sessions
        .iter()
        .filter(|s| s.completed)
        .map(|s| s.started_at)
        .max();

    DashboardSummary {
        sessions_this_week,
        weekly_volume_kg: volume.round() as i64,
        last_workout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-06-15T12:00:00Z".parse().unwrap()
    }

    fn session(days_ago: i64, completed: bool) -> SessionStamp {
        SessionStamp {
            started_at: now() - Duration::days(days_ago),
            completed,
        }
    }

    fn volume_set(days_ago: i64, weight: Option<f64>, reps: Option<i64>) -> VolumeSet {
        VolumeSet {
            weight_kg: weight,
            reps,
            completed: true,
            started_at: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn null_weight_or_reps_contribute_zero_volume() {
        let sets = vec![
            volume_set(1, Some(100.0), Some(5)),
            volume_set(1, Some(80.0), None),
        ];

        let summary = dashboard_summary(now(), &[], &sets);
        assert_eq!(summary.weekly_volume_kg, 500);
    }

    #[test]
    fn volume_rounds_once_at_the_end() {
        // Three sets of 33.4 sum to 100.2 and round to 100; rounding each
        // set first would give 99.
        let sets = vec![
            volume_set(1, Some(16.7), Some(2)),
            volume_set(1, Some(16.7), Some(2)),
            volume_set(1, Some(16.7), Some(2)),
        ];

        let summary = dashboard_summary(now(), &[], &sets);
        assert_eq!(summary.weekly_volume_kg, 100);
    }

    #[test]
    fn only_recent_completed_sessions_are_counted() {
        let sessions = vec![
            session(1, true),
            session(6, true),
            session(8, true),  // outside the window
            session(2, false), // still running
        ];

        let summary = dashboard_summary(now(), &sessions, &[]);
        assert_eq!(summary.sessions_this_week, 2);
    }

    #[test]
    fn sets_outside_the_window_add_nothing() {
        let sets = vec![
            volume_set(1, Some(100.0), Some(5)),
            volume_set(9, Some(200.0), Some(5)),
        ];

        let summary = dashboard_summary(now(), &[], &sets);
        assert_eq!(summary.weekly_volume_kg, 500);
    }

    #[test]
    fn incomplete_sets_add_nothing() {
        let mut pending = volume_set(1, Some(100.0), Some(5));
        pending.completed = false;

        let summary = dashboard_summary(now(), &[], &[pending]);
        assert_eq!(summary.weekly_volume_kg, 0);
    }

    #[test]
    fn last_workout_ignores_the_window() {
        let sessions = vec![session(30, true), session(45, true)];

        let summary = dashboard_summary(now(), &sessions, &[]);
        assert_eq!(summary.sessions_this_week, 0);
        assert_eq!(summary.last_workout, Some(now() - Duration::days(30)));
    }

    #[test]
    fn no_completed_sessions_means_no_last_workout() {
        let sessions = vec![session(1, false)];

        let summary = dashboard_summary(now(), &sessions, &[]);
        assert_eq!(summary.last_workout, None);
    }
}
