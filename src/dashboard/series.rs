use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::dates::local_day;
use crate::models::entry::PainEntry;

/// Length of the trailing dashboard window, in days.
pub const WINDOW_DAYS: i64 = 7;

/// One day of the trailing chart window. `average` is `None` when the day
/// has no entries: a gap in the chart, not a plotted zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub average: Option<f64>,
    pub count: u32,
}

/// Per-day mean pain for each of the 7 local calendar days ending today.
/// Always exactly 7 points, oldest first, regardless of how sparse the
/// input is.
pub fn rolling_series(entries: &[PainEntry], now: DateTime<Utc>, tz: Tz) -> Vec<SeriesPoint> {
    let today = local_day(now, tz);

    (0..WINDOW_DAYS)
        .map(|offset| {
            let day = today - Duration::days(WINDOW_DAYS - 1 - offset);

            let mut sum = 0i64;
            let mut count = 0u32;
            for entry in entries {
                if local_day(entry.recorded_at, tz) == day {
                    sum += i64::from(entry.pain_level);
                    count += 1;
                }
            }

            SeriesPoint {
                label: day.format("%a").to_string(),
                average: (count > 0).then(|| sum as f64 / f64::from(count)),
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn entry(pain: i16, recorded_at: DateTime<Utc>) -> PainEntry {
        PainEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            recorded_at,
            pain_level: pain,
            symptoms: vec![],
            quality_of_life: None,
            note: None,
            created_at: recorded_at,
            updated_at: recorded_at,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    // Thursday 2026-08-06, noon UTC
    fn now() -> DateTime<Utc> {
        at(2026, 8, 6, 12)
    }

    #[test]
    fn test_always_seven_points_oldest_first() {
        let series = rolling_series(&[], now(), chrono_tz::UTC);
        assert_eq!(series.len(), 7);
        // today-6 is Friday 2026-07-31, today is Thursday
        assert_eq!(series[0].label, "Fri");
        assert_eq!(series[6].label, "Thu");
    }

    #[test]
    fn test_empty_input_is_all_gaps() {
        let series = rolling_series(&[], now(), chrono_tz::UTC);
        for point in &series {
            assert_eq!(point.average, None);
            assert_eq!(point.count, 0);
        }
    }

    #[test]
    fn test_gap_day_is_none_but_pain_zero_day_is_zero() {
        // One pain-0 entry yesterday, nothing today
        let entries = vec![entry(0, at(2026, 8, 5, 9))];
        let series = rolling_series(&entries, now(), chrono_tz::UTC);

        let yesterday = &series[5];
        assert_eq!(yesterday.average, Some(0.0));
        assert_eq!(yesterday.count, 1);

        let today = &series[6];
        assert_eq!(today.average, None);
        assert_eq!(today.count, 0);
    }

    #[test]
    fn test_per_day_mean_over_multiple_entries() {
        let entries = vec![
            entry(4, at(2026, 8, 6, 8)),
            entry(7, at(2026, 8, 6, 18)),
        ];
        let series = rolling_series(&entries, now(), chrono_tz::UTC);
        assert_eq!(series[6].average, Some(5.5));
        assert_eq!(series[6].count, 2);
    }

    #[test]
    fn test_entries_outside_window_are_ignored() {
        let entries = vec![
            entry(9, at(2026, 7, 30, 12)), // 7 days ago, just outside
            entry(2, at(2026, 7, 31, 12)), // oldest day in window
        ];
        let series = rolling_series(&entries, now(), chrono_tz::UTC);
        assert_eq!(series[0].average, Some(2.0));
        assert_eq!(series.iter().map(|p| p.count).sum::<u32>(), 1);
    }

    #[test]
    fn test_bucketing_respects_timezone() {
        use chrono_tz::America::New_York;
        // 23:30 New York on Aug 5 = 03:30 UTC Aug 6
        let late = New_York
            .with_ymd_and_hms(2026, 8, 5, 23, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        let series = rolling_series(&[entry(6, late)], now(), New_York);
        assert_eq!(series[5].count, 1, "entry belongs to Aug 5 locally");
        assert_eq!(series[6].count, 0);
    }
}
