#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Split a total second count into hours/minutes/seconds. Integer division,
/// truncating toward zero.
pub fn split_duration(total_sec: i64) -> DurationParts {
    DurationParts {
        hours: total_sec / 3600,
        minutes: (total_sec % 3600) / 60,
        seconds: total_sec % 60,
    }
}

/// Inverse of [`split_duration`]. Purely additive: minutes or seconds over 59
/// are not rejected, they just carry into the total.
pub fn parse_duration(hours: i64, minutes: i64, seconds: i64) -> i64 {
    hours * 3600 + minutes * 60 + seconds
}

/// Human duration: "1h 02m", "5m 30s", or "45s".
pub fn format_duration(total_sec: i64) -> String {
    let parts = split_duration(total_sec);
    if parts.hours > 0 {
        format!("{}h {:02}m", parts.hours, parts.minutes)
    } else if parts.minutes > 0 {
        format!("{}m {:02}s", parts.minutes, parts.seconds)
    } else {
        format!("{}s", parts.seconds)
    }
}

/// Compact "M:SS" clock, minutes uncapped.
pub fn format_clock(total_sec: i64) -> String {
    format!("{}:{:02}", total_sec / 60, total_sec % 60)
}

/// Timer display for a running session: "H:MM:SS" once past the hour,
/// "M:SS" before.
pub fn format_elapsed(total_sec: i64) -> String {
    let parts = split_duration(total_sec);
    if parts.hours > 0 {
        format!("{}:{:02}:{:02}", parts.hours, parts.minutes, parts.seconds)
    } else {
        format!("{}:{:02}", parts.minutes, parts.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_hours_minutes_seconds() {
        let parts = split_duration(3725);
        assert_eq!(parts.hours, 1);
        assert_eq!(parts.minutes, 2);
        assert_eq!(parts.seconds, 5);
    }

    #[test]
    fn split_of_zero_is_all_zero() {
        assert_eq!(
            split_duration(0),
            DurationParts {
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn parse_is_the_inverse_of_split() {
        assert_eq!(parse_duration(1, 2, 5), 3725);
        for total in [0, 1, 59, 60, 3599, 3600, 3725, 86399] {
            let p = split_duration(total);
            assert_eq!(parse_duration(p.hours, p.minutes, p.seconds), total);
        }
    }

    #[test]
    fn parse_does_not_reject_overflowing_parts() {
        // 0h 90m 75s is accepted as-is.
        assert_eq!(parse_duration(0, 90, 75), 5475);
    }

    #[test]
    fn duration_formats_pick_the_right_unit() {
        assert_eq!(format_duration(3725), "1h 02m");
        assert_eq!(format_duration(330), "5m 30s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(0), "0s");
    }

    #[test]
    fn clock_keeps_minutes_uncapped() {
        assert_eq!(format_clock(325), "5:25");
        assert_eq!(format_clock(3725), "62:05");
        assert_eq!(format_clock(9), "0:09");
    }

    #[test]
    fn elapsed_switches_format_at_one_hour() {
        assert_eq!(format_elapsed(125), "2:05");
        assert_eq!(format_elapsed(3725), "1:02:05");
        assert_eq!(format_elapsed(0), "0:00");
    }
}
