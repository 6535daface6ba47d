//! Time formatting utilities

/// Format seconds as an SRT timestamp: `HH:MM:SS,mmm`.
///
/// Milliseconds are rounded, not truncated, so 1.4996s renders as 00:00:01,500.
/// Negative inputs clamp to zero.
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Format a duration in seconds for log output: `MM:SS.mmm` or `HH:MM:SS.mmm`.
pub fn format_duration(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srt_timestamp_zero() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
    }

    #[test]
    fn test_srt_timestamp_sub_second() {
        assert_eq!(format_srt_timestamp(1.5), "00:00:01,500");
    }

    #[test]
    fn test_srt_timestamp_minutes() {
        assert_eq!(format_srt_timestamp(65.25), "00:01:05,250");
    }

    #[test]
    fn test_srt_timestamp_hours() {
        assert_eq!(format_srt_timestamp(3661.1), "01:01:01,100");
    }

    #[test]
    fn test_srt_timestamp_multi_hour() {
        assert_eq!(format_srt_timestamp(7322.007), "02:02:02,007");
    }

    #[test]
    fn test_srt_timestamp_rounds_milliseconds() {
        assert_eq!(format_srt_timestamp(1.4996), "00:00:01,500");
        assert_eq!(format_srt_timestamp(0.0004), "00:00:00,000");
    }

    #[test]
    fn test_srt_timestamp_negative_clamps() {
        assert_eq!(format_srt_timestamp(-5.0), "00:00:00,000");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(90.5), "01:30.500");
        assert_eq!(format_duration(3723.456), "01:02:03.456");
    }
}
