//! Time formatting utilities

/// Format seconds as `m:ss`, flooring both parts
///
/// Negative or non-finite input formats as `0:00`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a clip window as `m:ss-m:ss`
pub fn format_window(start_sec: f64, end_sec: f64) -> String {
    format!("{}-{}", format_timestamp(start_sec), format_timestamp(end_sec))
}
