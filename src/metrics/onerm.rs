/// Estimated one-rep max via the Epley formula, rounded to one decimal.
/// A true single (`reps == 1`) is returned unchanged, not rounded.
///
/// Defined for `reps >= 1` only; anything lower is a caller bug.
pub fn epley_1rm(weight_kg: f64, reps: i64) -> f64 {
    assert!(reps >= 1, "epley_1rm requires reps >= 1, got {}", reps);

    if reps == 1 {
        return weight_kg;
    }

    (weight_kg * (1.0 + reps as f64 / 30.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_single_is_its_own_max() {
        assert_eq!(epley_1rm(100.0, 1), 100.0);
        assert_eq!(epley_1rm(62.5, 1), 62.5);
        // Not even rounded: a true single passes through untouched.
        assert_eq!(epley_1rm(102.34, 1), 102.34);
    }

    #[test]
    fn estimates_round_to_one_decimal() {
        assert_eq!(epley_1rm(100.0, 10), 133.3);
        assert_eq!(epley_1rm(80.0, 10), 106.7);
        assert_eq!(epley_1rm(100.0, 5), 116.7);
        assert_eq!(epley_1rm(90.0, 8), 114.0);
    }

    #[test]
    fn more_reps_never_lower_the_estimate() {
        let mut last = 0.0;
        for reps in 1..=15 {
            let est = epley_1rm(100.0, reps);
            assert!(est >= last, "estimate dropped at {} reps", reps);
            last = est;
        }
    }

    #[test]
    #[should_panic(expected = "reps >= 1")]
    fn zero_reps_is_rejected_loudly() {
        epley_1rm(100.0, 0);
    }
}
