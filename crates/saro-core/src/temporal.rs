//! # Temporal Helpers
//!
//! All timestamps are UTC. Records carry `chrono::DateTime<Utc>` and
//! serialize as RFC 3339. Forecasts and deadlines that only need a calendar
//! day are rendered as `YYYY-MM-DD`.

use chrono::{DateTime, Duration, Utc};

/// Current UTC time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar date `days` from `from`, formatted `YYYY-MM-DD`.
pub fn date_in_days(from: DateTime<Utc>, days: i64) -> String {
    (from + Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// Instant `minutes` before `from`.
pub fn minutes_before(from: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    from - Duration::minutes(minutes)
}

/// Instant `minutes` after `from`.
pub fn minutes_after(from: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    from + Duration::minutes(minutes)
}

/// Year-month label (`YYYY-MM`) for the month `back` months before `from`.
pub fn month_label(from: DateTime<Utc>, back: u32) -> String {
    use chrono::Datelike;
    let total = from.year() * 12 + from.month0() as i32 - back as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) + 1;
    format!("{year:04}-{month:02}")
}
