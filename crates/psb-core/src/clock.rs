use std::time::SystemTime;

use time::{OffsetDateTime, UtcOffset, macros::format_description};

/// Sleep until the wall clock reaches `t`. Returns immediately if `t` has passed.
pub async fn wait_until(t: SystemTime) {
    while let Ok(remaining) = t.duration_since(SystemTime::now()) {
        if remaining.is_zero() {
            break;
        }
        tokio::time::sleep(remaining).await;
    }
}

/// `HH:MM:SS` in the local time zone (UTC when the offset cannot be determined).
pub fn readable_time(t: SystemTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::from(t)
        .to_offset(offset)
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}

/// Run directory name, `YYYY-MM-DD_HH-MM-SS` in UTC.
pub fn run_dir_name(t: SystemTime) -> String {
    OffsetDateTime::from(t)
        .format(format_description!(
            "[year]-[month]-[day]_[hour]-[minute]-[second]"
        ))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn run_dir_name_is_utc_timestamp() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(run_dir_name(t), "2023-11-14_22-13-20");
    }

    #[test]
    fn readable_time_has_clock_shape() {
        let s = readable_time(SystemTime::now());
        assert_eq!(s.len(), 8);
        assert_eq!(s.matches(':').count(), 2);
    }

    #[tokio::test]
    async fn wait_until_reaches_target() {
        let target = SystemTime::now() + Duration::from_millis(30);
        wait_until(target).await;
        assert!(SystemTime::now() >= target);
    }

    #[tokio::test]
    async fn wait_until_past_returns_immediately() {
        let start = std::time::Instant::now();
        wait_until(SystemTime::now() - Duration::from_secs(5)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
