use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::warn;

/// Parse a 12-hour wall-clock time like "5:59 PM" or "05:59PM" into a
/// canonical time-of-day. The space before the meridiem is optional and the
/// meridiem is case-insensitive.
///
/// 12:XX AM maps to hour 0, 12:XX PM stays 12, other PM hours add 12. Hours
/// outside 1-12 and minutes outside 00-59 do not match.
pub fn parse_twelve_hour(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if !trimmed.is_ascii() || trimmed.len() < 6 {
        return None;
    }

    let (body, suffix) = trimmed.split_at(trimmed.len() - 2);
    let pm = match suffix.to_ascii_uppercase().as_str() {
        "AM" => false,
        "PM" => true,
        _ => return None,
    };

    let body = body.trim_end();
    let (hour_str, minute_str) = body.split_once(':')?;
    if hour_str.is_empty()
        || hour_str.len() > 2
        || !hour_str.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    if minute_str.len() != 2 || !minute_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour: u32 = hour_str.parse().ok()?;
    let minute: u32 = minute_str.parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let hour24 = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    NaiveTime::from_hms_opt(hour24, minute, 0)
}

/// Like [`parse_twelve_hour`], but malformed input falls back to midnight.
///
/// Historical reservation documents contain garbage time strings; the system
/// must stay readable with them, so the fallback is a logged data-quality
/// warning rather than an error.
pub fn normalize_twelve_hour(raw: &str) -> NaiveTime {
    match parse_twelve_hour(raw) {
        Some(time) => time,
        None => {
            warn!(time = raw, "invalid 12-hour time string, falling back to midnight");
            NaiveTime::MIN
        }
    }
}

/// Combine a calendar day with a time-of-day into one absolute instant. All
/// instants in this system are UTC; no offset arithmetic is applied.
pub fn compose_instant(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date.and_time(time), Utc)
}
