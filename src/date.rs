//! Epoch-second helpers: day arithmetic, call-time "now", and calendar labels for axes.

use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Seconds in one sampling day.
pub const DAY_SECONDS: i64 = 86_400;

/// Current wall-clock time in epoch seconds, read when called.
pub fn now_epoch() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Number of whole days in `[start, end)`; zero when the range is empty or reversed.
pub fn whole_days(start: i64, end: i64) -> usize {
    if end <= start {
        return 0;
    }
    ((end - start) / DAY_SECONDS) as usize
}

/// UTC calendar date of an epoch timestamp (clamped to the epoch when out of range).
pub fn date_from_epoch(ts: i64) -> Date {
    OffsetDateTime::from_unix_timestamp(ts)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .date()
}

/// `YYYY-MM-DD` label for an epoch timestamp.
pub fn date_label(ts: i64) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    date_from_epoch(ts)
        .format(&fmt)
        .unwrap_or_else(|_| date_from_epoch(ts).to_string())
}
