use std::collections::BTreeMap;

use serde::Serialize;

/// One qualifying strength set, already filtered and in ascending date
/// order by the caller.
#[derive(Debug, Clone)]
pub struct WeightSample {
    pub date: String,
    pub weight_kg: f64,
    pub reps: Option<i64>,
}

/// One cardio log in ascending date order.
#[derive(Debug, Clone)]
pub struct CardioSample {
    pub date: String,
    pub distance_km: Option<f64>,
    pub pace_sec_per_km: Option<f64>,
    pub duration_sec: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: String,
    pub weight_kg: f64,
    pub reps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardioPoint {
    pub date: String,
    pub distance_km: f64,
    pub pace_sec_per_km: Option<f64>,
    pub duration_sec: i64,
}

/// Reduce strength samples to one chart point per calendar day, keeping the
/// heaviest set of each day. Replacement is strictly-greater, so the first
/// sample of a day survives an exact tie. Output is date-ascending; the
/// fixed-width `YYYY-MM-DD` form makes plain string order correct.
pub fn weight_history(samples: &[WeightSample]) -> Vec<WeightPoint> {
    let mut by_date: BTreeMap<&str, WeightPoint> = BTreeMap::new();

    for sample in samples {
        let keep = match by_date.get(sample.date.as_str()) {
            Some(current) => sample.weight_kg > current.weight_kg,
            None => true,
        };
        if keep {
            by_date.insert(
                sample.date.as_str(),
                WeightPoint {
                    date: sample.date.clone(),
                    weight_kg: sample.weight_kg,
                    reps: sample.reps.unwrap_or(0),
                },
            );
        }
    }

    by_date.into_values().collect()
}

/// Cardio charts keep every log as its own point, no per-day reduction.
/// The strength/cardio asymmetry is deliberate: a day with two runs shows
/// two points.
pub fn cardio_history(samples: &[CardioSample]) -> Vec<CardioPoint> {
    let mut points: Vec<CardioPoint> = samples
        .iter()
        .map(|sample| CardioPoint {
            date: sample.date.clone(),
            distance_km: sample.distance_km.unwrap_or(0.0),
            pace_sec_per_km: sample.pace_sec_per_km,
            duration_sec: sample.duration_sec.unwrap_or(0),
        })
        .collect();

    // Stable sort keeps same-day logs in their original order.
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(date: &str, weight: f64, reps: i64) -> WeightSample {
        WeightSample {
            date: date.to_string(),
            weight_kg: weight,
            reps: Some(reps),
        }
    }

    fn cardio(date: &str, distance: f64, pace: Option<f64>, duration: i64) -> CardioSample {
        CardioSample {
            date: date.to_string(),
            distance_km: Some(distance),
            pace_sec_per_km: pace,
            duration_sec: Some(duration),
        }
    }

    #[test]
    fn keeps_the_heaviest_set_of_each_day() {
        let samples = vec![
            sample("2024-03-01", 80.0, 8),
            sample("2024-03-01", 85.0, 5),
            sample("2024-03-01", 82.5, 6),
            sample("2024-03-04", 87.5, 3),
        ];

        let points = weight_history(&samples);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].weight_kg, 85.0);
        assert_eq!(points[0].reps, 5);
        assert_eq!(points[1].date, "2024-03-04");
    }

    #[test]
    fn equal_weights_keep_the_first_set_of_the_day() {
        let samples = vec![
            sample("2024-03-01", 85.0, 5),
            sample("2024-03-01", 85.0, 8),
        ];

        let points = weight_history(&samples);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].reps, 5);
    }

    #[test]
    fn output_is_sorted_by_date_string() {
        let samples = vec![
            sample("2024-03-10", 90.0, 5),
            sample("2024-03-02", 80.0, 5),
            sample("2024-12-01", 100.0, 5),
        ];

        let dates: Vec<String> = weight_history(&samples)
            .into_iter()
            .map(|p| p.date)
            .collect();
        assert_eq!(dates, ["2024-03-02", "2024-03-10", "2024-12-01"]);
    }

    #[test]
    fn missing_reps_chart_as_zero() {
        let mut s = sample("2024-03-01", 85.0, 0);
        s.reps = None;

        let points = weight_history(&[s]);
        assert_eq!(points[0].reps, 0);
    }

    #[test]
    fn cardio_keeps_every_log_even_on_the_same_day() {
        let samples = vec![
            cardio("2024-03-01", 5.0, Some(300.0), 1500),
            cardio("2024-03-01", 3.0, Some(290.0), 870),
            cardio("2024-03-05", 10.0, Some(310.0), 3100),
        ];

        let points = cardio_history(&samples);
        assert_eq!(points.len(), 3);
        // Same-day logs stay in logged order.
        assert_eq!(points[0].distance_km, 5.0);
        assert_eq!(points[1].distance_km, 3.0);
    }

    #[test]
    fn cardio_nulls_default_to_zero_but_pace_stays_null() {
        let mut s = cardio("2024-03-01", 0.0, None, 0);
        s.distance_km = None;
        s.duration_sec = None;

        let points = cardio_history(&[s]);
        assert_eq!(points[0].distance_km, 0.0);
        assert_eq!(points[0].duration_sec, 0);
        assert_eq!(points[0].pace_sec_per_km, None);
    }

    #[test]
    fn cardio_output_is_date_sorted() {
        let samples = vec![
            cardio("2024-05-01", 5.0, None, 1500),
            cardio("2024-03-01", 5.0, None, 1500),
        ];

        let points = cardio_history(&samples);
        assert_eq!(points[0].date, "2024-03-01");
        assert_eq!(points[1].date, "2024-05-01");
    }
}
