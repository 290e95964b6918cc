use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// parse the date formats the backend and the forms produce
///
/// accepts `2023-11-26`, RFC 3339 timestamps (`2023-11-26T00:00:00.000Z`) and
/// naive timestamps (`2023-11-26T08:30:00`). anything else is `None`.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(timestamp.date());
        }
    }
    None
}

/// whole days until `due`, rounded up
///
/// the due date counts from midnight UTC, so anything due today yields 0 for
/// the rest of the day and yesterday's date yields -1.
pub fn days_remaining(due: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due_at = due.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let millis = (due_at - now).num_milliseconds();
    // ceil for a positive divisor
    -((-millis).div_euclid(MILLIS_PER_DAY))
}

/// `start` advanced by `days` calendar days, `None` past chrono's range
pub fn add_days(start: NaiveDate, days: i64) -> Option<NaiveDate> {
    start.checked_add_signed(Duration::try_days(days)?)
}
