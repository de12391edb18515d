use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch as a float; times before the epoch clamp to `0.0`.
pub fn epoch_seconds(t: SystemTime) -> f64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Current wall-clock time, see [`epoch_seconds`].
pub fn now_epoch() -> f64 {
    epoch_seconds(SystemTime::now())
}
