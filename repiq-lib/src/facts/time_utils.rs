use chrono::{DateTime, Utc};

/// Whole days elapsed since `then`, floored, and zero for timestamps in the future.
#[must_use]
pub fn days_since(then: DateTime<Utc>) -> u64 {
    days_between(then, Utc::now())
}

#[must_use]
pub fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from(now.signed_duration_since(then).num_days()).unwrap_or(0)
}

/// The calendar date `days` ago, formatted for search qualifiers such as `closed:>2024-01-31`.
#[must_use]
pub fn date_days_ago(days: i64, now: DateTime<Utc>) -> String {
    (now - chrono::Duration::days(days)).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn partial_days_are_floored() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let then = Utc.with_ymd_and_hms(2024, 3, 8, 13, 0, 0).unwrap();
        assert_eq!(days_between(then, now), 1);
    }

    #[test]
    fn future_timestamps_are_zero_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let then = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert_eq!(days_between(then, now), 0);
    }

    #[test]
    fn date_days_ago_formats_calendar_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(date_days_ago(30, now), "2024-02-09");
    }
}
