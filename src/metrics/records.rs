use crate::metrics::onerm::epley_1rm;
use crate::metrics::pace::calc_pace;

/// One logged resistance set, tagged with its session's calendar date.
#[derive(Debug, Clone)]
pub struct SetEntry {
    pub weight_kg: Option<f64>,
    pub reps: Option<i64>,
    pub completed: bool,
    pub date: String,
    pub session_id: String,
}

/// One logged cardio effort, tagged with its session's calendar date.
#[derive(Debug, Clone)]
pub struct CardioLogEntry {
    pub distance_km: Option<f64>,
    pub duration_sec: Option<i64>,
    pub date: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GymRecord {
    pub best_weight_kg: f64,
    pub best_reps: Option<i64>,
    pub best_1rm_kg: Option<f64>,
    pub achieved_at: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardioRecord {
    pub best_distance_km: f64,
    pub best_pace_sec_per_km: Option<f64>,
    pub best_duration_sec: Option<i64>,
    pub achieved_at: Option<String>,
    pub session_id: Option<String>,
}

/// Fold every historical set for one exercise into its record row.
///
/// Only completed sets with a weight count. The heaviest set supplies
/// `best_weight_kg`/`best_reps` (ties broken by higher reps, first seen
/// wins an exact tie); the best Epley estimate is tracked independently
/// and supplies `achieved_at`. Returns `None` when nothing qualifies, in
/// which case no record row should exist at all.
pub fn gym_record(sets: &[SetEntry]) -> Option<GymRecord> {
    let mut best: Option<(f64, Option<i64>)> = None;
    let mut best_est: Option<(f64, &SetEntry)> = None;

    for set in sets {
        if !set.completed {
            continue;
        }
        let Some(weight) = set.weight_kg else {
            continue;
        };

        match best {
            None => best = Some((weight, set.reps)),
            Some((bw, br)) => {
                // Strictly-greater comparisons, so the earliest of equal
                // sets keeps the record.
                if weight > bw || (weight == bw && set.reps > br) {
                    best = Some((weight, set.reps));
                }
            }
        }

        // The estimator is only defined for reps >= 1; a rep-less or
        // zero-rep set still counts for best weight above.
        if let Some(reps) = set.reps.filter(|&r| r >= 1) {
            let est = epley_1rm(weight, reps);
            let improved = match best_est {
                None => true,
                Some((cur, _)) => est > cur,
            };
            if improved {
                best_est = Some((est, set));
            }
        }
    }

    let (best_weight_kg, best_reps) = best?;
    Some(GymRecord {
        best_weight_kg,
        best_reps,
        best_1rm_kg: best_est.map(|(est, _)| est),
        achieved_at: best_est.map(|(_, set)| set.date.clone()),
        session_id: best_est.map(|(_, set)| set.session_id.clone()),
    })
}

/// Fold every historical cardio log for one exercise into its record row.
///
/// Only logs with a distance count. Longest distance, fastest pace, and
/// longest duration are each tracked independently; `achieved_at` follows
/// the best pace. Returns `None` when nothing qualifies.
pub fn cardio_record(logs: &[CardioLogEntry]) -> Option<CardioRecord> {
    let mut best_distance: Option<f64> = None;
    let mut best_duration: Option<i64> = None;
    let mut best_pace: Option<(f64, &CardioLogEntry)> = None;

    for log in logs {
        let Some(distance) = log.distance_km else {
            continue;
        };

        best_distance = Some(match best_distance {
            None => distance,
            Some(d) => d.max(distance),
        });

        let Some(duration) = log.duration_sec else {
            continue;
        };
        best_duration = Some(match best_duration {
            None => duration,
            Some(d) => d.max(duration),
        });

        if let Some(pace) = calc_pace(distance, duration) {
            let faster = match best_pace {
                None => true,
                Some((cur, _)) => pace < cur,
            };
            if faster {
                best_pace = Some((pace, log));
            }
        }
    }

    let best_distance_km = best_distance?;
    Some(CardioRecord {
        best_distance_km,
        best_pace_sec_per_km: best_pace.map(|(pace, _)| pace),
        best_duration_sec: best_duration,
        achieved_at: best_pace.map(|(_, log)| log.date.clone()),
        session_id: best_pace.map(|(_, log)| log.session_id.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(weight: f64, reps: i64, date: &str) -> SetEntry {
        SetEntry {
            weight_kg: Some(weight),
            reps: Some(reps),
            completed: true,
            date: date.to_string(),
            session_id: format!("session-{}", date),
        }
    }

    fn log(distance: f64, duration: i64, date: &str) -> CardioLogEntry {
        CardioLogEntry {
            distance_km: Some(distance),
            duration_sec: Some(duration),
            date: date.to_string(),
            session_id: format!("session-{}", date),
        }
    }

    #[test]
    fn heaviest_set_and_best_estimate_can_differ() {
        let sets = vec![
            set(80.0, 10, "2024-01-01"),
            set(100.0, 5, "2024-01-02"),
            set(90.0, 8, "2024-01-03"),
        ];

        let record = gym_record(&sets).unwrap();
        assert_eq!(record.best_weight_kg, 100.0);
        assert_eq!(record.best_reps, Some(5));
        // max(106.7, 116.7, 114.0): the 100 kg set wins here too.
        assert_eq!(record.best_1rm_kg, Some(116.7));
        assert_eq!(record.achieved_at.as_deref(), Some("2024-01-02"));
        assert_eq!(record.session_id.as_deref(), Some("session-2024-01-02"));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let sets = vec![
            set(80.0, 10, "2024-01-01"),
            set(100.0, 5, "2024-01-02"),
            set(90.0, 8, "2024-01-03"),
        ];

        assert_eq!(gym_record(&sets), gym_record(&sets));
    }

    #[test]
    fn unfinished_and_weightless_sets_are_ignored() {
        let mut skipped = set(200.0, 1, "2024-01-01");
        skipped.completed = false;
        let mut no_weight = set(0.0, 12, "2024-01-02");
        no_weight.weight_kg = None;

        let sets = vec![skipped, no_weight, set(60.0, 5, "2024-01-03")];
        let record = gym_record(&sets).unwrap();
        assert_eq!(record.best_weight_kg, 60.0);
    }

    #[test]
    fn no_qualifying_sets_means_no_record() {
        assert_eq!(gym_record(&[]), None);

        let mut pending = set(100.0, 5, "2024-01-01");
        pending.completed = false;
        assert_eq!(gym_record(&[pending]), None);
    }

    #[test]
    fn equal_weight_ties_break_on_reps_then_first_seen() {
        let sets = vec![set(100.0, 3, "2024-01-01"), set(100.0, 6, "2024-01-02")];
        let record = gym_record(&sets).unwrap();
        assert_eq!(record.best_reps, Some(6));

        // Fully equal sets: the earlier date keeps the best-1rm slot.
        let sets = vec![set(100.0, 5, "2024-01-01"), set(100.0, 5, "2024-01-02")];
        let record = gym_record(&sets).unwrap();
        assert_eq!(record.achieved_at.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn rep_less_set_counts_for_weight_but_not_estimate() {
        let mut heavy_no_reps = set(120.0, 1, "2024-01-05");
        heavy_no_reps.reps = None;

        let sets = vec![set(100.0, 5, "2024-01-02"), heavy_no_reps];
        let record = gym_record(&sets).unwrap();
        assert_eq!(record.best_weight_kg, 120.0);
        assert_eq!(record.best_reps, None);
        // The estimate still comes from the 100 kg × 5 set.
        assert_eq!(record.best_1rm_kg, Some(116.7));
        assert_eq!(record.achieved_at.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn all_rep_less_sets_leave_the_estimate_empty() {
        let mut a = set(100.0, 1, "2024-01-01");
        a.reps = None;
        let mut b = set(90.0, 1, "2024-01-02");
        b.reps = None;

        let record = gym_record(&[a, b]).unwrap();
        assert_eq!(record.best_weight_kg, 100.0);
        assert_eq!(record.best_1rm_kg, None);
        assert_eq!(record.achieved_at, None);
    }

    #[test]
    fn distance_and_pace_records_are_independent() {
        let logs = vec![
            // 21.1 km long and slow: 6:00 /km.
            log(21.1, 7596, "2024-02-01"),
            // 5 km short and fast: 4:00 /km.
            log(5.0, 1200, "2024-02-10"),
        ];

        let record = cardio_record(&logs).unwrap();
        assert_eq!(record.best_distance_km, 21.1);
        assert_eq!(record.best_pace_sec_per_km, Some(240.0));
        assert_eq!(record.best_duration_sec, Some(7596));
        assert_eq!(record.achieved_at.as_deref(), Some("2024-02-10"));
    }

    #[test]
    fn pace_needs_a_duration_and_a_positive_distance() {
        let mut timeless = log(10.0, 0, "2024-02-01");
        timeless.duration_sec = None;

        let record = cardio_record(&[timeless]).unwrap();
        assert_eq!(record.best_distance_km, 10.0);
        assert_eq!(record.best_pace_sec_per_km, None);
        assert_eq!(record.best_duration_sec, None);
        assert_eq!(record.achieved_at, None);
    }

    #[test]
    fn distance_less_logs_are_ignored_entirely() {
        let mut unmeasured = log(0.0, 1800, "2024-02-01");
        unmeasured.distance_km = None;

        assert_eq!(cardio_record(&[unmeasured]), None);
        assert_eq!(cardio_record(&[]), None);
    }
}
