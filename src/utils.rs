use std::time::Duration;

/// Compact wall-clock duration: `4.250s`, `2m05.003s`, `1h02m03.400s`.
pub fn format_human_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);

    match (hours, minutes) {
        (0, 0) => format!("{seconds}.{millis:03}s"),
        (0, _) => format!("{minutes}m{seconds:02}.{millis:03}s"),
        _ => format!("{hours}h{minutes:02}m{seconds:02}.{millis:03}s"),
    }
}
