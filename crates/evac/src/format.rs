//! Human readable route figures.

/// `"12 minutes"`, `"1 minute"`, `"2 hours 5 min"`, `"1 hour"`.
pub fn format_duration(seconds: f64) -> String {
    let minutes = (seconds.max(0.0) / 60.0).floor() as u64;
    let hours = minutes / 60;
    if hours > 0 {
        let rest = minutes % 60;
        let unit = if hours == 1 { "hour" } else { "hours" };
        if rest > 0 {
            format!("{hours} {unit} {rest} min")
        } else {
            format!("{hours} {unit}")
        }
    } else {
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        format!("{minutes} {unit}")
    }
}

/// Meters below one kilometer, otherwise kilometers with two decimals.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_distance, format_duration};

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0 minutes");
        assert_eq!(format_duration(90.0), "1 minute");
        assert_eq!(format_duration(1800.0), "30 minutes");
        assert_eq!(format_duration(3600.0), "1 hour");
        assert_eq!(format_duration(3960.0), "1 hour 6 min");
        assert_eq!(format_duration(7500.0), "2 hours 5 min");
        assert_eq!(format_duration(-5.0), "0 minutes");
    }

    #[test]
    fn distances() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1000.0), "1.00 km");
        assert_eq!(format_distance(2500.0), "2.50 km");
    }
}
