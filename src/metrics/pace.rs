/// Seconds per kilometre, or `None` when the distance is zero or negative.
/// This is the one defensive check the math layer performs; everything else
/// is garbage-in garbage-out.
pub fn calc_pace(distance_km: f64, duration_sec: i64) -> Option<f64> {
    if distance_km <= 0.0 {
        return None;
    }

    Some(duration_sec as f64 / distance_km)
}

/// Render a pace as "M:SS /km". Seconds are rounded independently of the
/// minute part, so 359.6 s/km comes out as "5:60 /km" rather than "6:00 /km".
pub fn format_pace(sec_per_km: f64) -> String {
    let minutes = (sec_per_km / 60.0).floor() as i64;
    let seconds = (sec_per_km % 60.0).round() as i64;
    format!("{}:{:02} /km", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_negative_distance_has_no_pace() {
        assert_eq!(calc_pace(0.0, 100), None);
        assert_eq!(calc_pace(-1.0, 100), None);
    }

    #[test]
    fn pace_is_seconds_over_kilometres() {
        assert_eq!(calc_pace(10.0, 3000), Some(300.0));
        assert_eq!(calc_pace(5.0, 1500), Some(300.0));
        // Unrounded at this layer.
        assert_eq!(calc_pace(3.0, 1000), Some(1000.0 / 3.0));
    }

    #[test]
    fn pace_formats_with_padded_seconds() {
        assert_eq!(format_pace(300.0), "5:00 /km");
        assert_eq!(format_pace(325.0), "5:25 /km");
        assert_eq!(format_pace(61.0), "1:01 /km");
    }

    #[test]
    fn seconds_can_round_to_sixty() {
        assert_eq!(format_pace(359.6), "5:60 /km");
    }
}
