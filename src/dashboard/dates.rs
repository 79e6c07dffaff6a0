use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar day containing `instant`, in the user's timezone. An instant
/// exactly on a local midnight boundary belongs to the day starting there.
pub fn local_day(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn is_same_local_day(instant: DateTime<Utc>, reference: DateTime<Utc>, tz: Tz) -> bool {
    local_day(instant, tz) == local_day(reference, tz)
}

/// Resolve a stored IANA timezone name, falling back to UTC when the name
/// is unrecognized.
pub fn resolve_tz(name: &str) -> Tz {
    name.parse().unwrap_or(chrono_tz::UTC)
}
