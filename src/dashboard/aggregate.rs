use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use uuid::Uuid;

use super::dates::{is_same_local_day, local_day};
use super::series::{rolling_series, SeriesPoint, WINDOW_DAYS};
use crate::models::entry::{PainEntry, QualityOfLife};

/// How many entries `recent_activity` carries.
pub const RECENT_LIMIT: usize = 5;

/// Week-over-week change in mean pain. Polarity is domain-specific: `Up`
/// means pain increased (worse), `Down` means it decreased (improved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    /// Absolute percent change between the two windows, one decimal.
    pub value: f64,
    pub direction: TrendDirection,
}

/// Histogram over the four fixed pain ranges: 0-2, 3-5, 6-8, 9-10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityDistribution {
    pub mild: u32,
    pub moderate: u32,
    pub severe: u32,
    pub extreme: u32,
}

impl SeverityDistribution {
    pub fn total(&self) -> u32 {
        self.mild + self.moderate + self.severe + self.extreme
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEntry {
    pub id: Uuid,
    pub pain_level: i16,
    pub recorded_at: DateTime<Utc>,
    pub symptoms: Vec<String>,
    pub quality_of_life: Option<QualityOfLife>,
}

/// Derived summary of an entry collection. Recomputed on every input
/// change, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_entries: usize,
    pub average_pain: f64,
    pub overall_average: f64,
    pub weekly_average: f64,
    pub today_count: usize,
    pub trend: Trend,
    pub recent_activity: Vec<RecentEntry>,
    pub severity: SeverityDistribution,
    pub series: Vec<SeriesPoint>,
}

/// The one authoritative metrics computation. `filtered` is whatever
/// date/symptom filter the caller currently has applied; `all_time`, when
/// supplied, drives the all-time total and overall average. `now` is
/// injected so the result is a pure function of its arguments.
///
/// Never fails: empty input degrades to zeroed scalars and gap-only series.
pub fn aggregate(
    filtered: &[PainEntry],
    all_time: Option<&[PainEntry]>,
    now: DateTime<Utc>,
    tz: Tz,
) -> MetricsSnapshot {
    let today = local_day(now, tz);

    // An empty all-time collection falls back to the filtered one for both
    // the total and the overall average
    let (total_entries, overall_source) = match all_time {
        Some(all) if !all.is_empty() => (all.len(), Some(all)),
        _ => (filtered.len(), None),
    };

    let average_pain = display_mean(mean_pain(filtered.iter()));
    let overall_average = match overall_source {
        Some(all) => display_mean(mean_pain(all.iter())),
        None => average_pain,
    };

    let today_count = filtered
        .iter()
        .filter(|e| is_same_local_day(e.recorded_at, now, tz))
        .count();

    let week_start = today - Duration::days(WINDOW_DAYS - 1);
    let weekly_average = display_mean(mean_pain(filtered.iter().filter(|e| {
        let day = local_day(e.recorded_at, tz);
        (week_start..=today).contains(&day)
    })));

    let trend = compute_trend(filtered, today, tz);

    let mut by_recency: Vec<&PainEntry> = filtered.iter().collect();
    // Stable sort: entries sharing a timestamp keep their input order
    by_recency.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    let recent_activity = by_recency
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|e| RecentEntry {
            id: e.id,
            pain_level: e.pain_level,
            recorded_at: e.recorded_at,
            symptoms: e.symptoms.clone(),
            quality_of_life: e.quality_of_life.clone().map(|q| q.0),
        })
        .collect();

    let mut severity = SeverityDistribution::default();
    for entry in filtered {
        // Out-of-range levels clamp to the nearest bucket so every entry
        // is counted exactly once
        match entry.pain_level {
            i16::MIN..=2 => severity.mild += 1,
            3..=5 => severity.moderate += 1,
            6..=8 => severity.severe += 1,
            _ => severity.extreme += 1,
        }
    }

    let series = rolling_series(filtered, now, tz);

    MetricsSnapshot {
        total_entries,
        average_pain,
        overall_average,
        weekly_average,
        today_count,
        trend,
        recent_activity,
        severity,
        series,
    }
}

fn mean_pain<'a>(entries: impl Iterator<Item = &'a PainEntry>) -> f64 {
    let mut sum = 0i64;
    let mut count = 0u32;
    for entry in entries {
        sum += i64::from(entry.pain_level);
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum as f64 / f64::from(count)
    }
}

/// Round to one decimal and clamp onto the pain scale.
fn display_mean(mean: f64) -> f64 {
    round1(mean).clamp(0.0, 10.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean pain of [today-6, today] against [today-13, today-7]. A zero
/// previous-window mean yields 0/neutral rather than a division by zero.
fn compute_trend(entries: &[PainEntry], today: NaiveDate, tz: Tz) -> Trend {
    let current_start = today - Duration::days(WINDOW_DAYS - 1);
    let previous_start = today - Duration::days(2 * WINDOW_DAYS - 1);
    let previous_end = today - Duration::days(WINDOW_DAYS);

    let window_mean = |start: NaiveDate, end: NaiveDate| {
        mean_pain(entries.iter().filter(|e| {
            let day = local_day(e.recorded_at, tz);
            (start..=end).contains(&day)
        }))
    };

    let current = window_mean(current_start, today);
    let previous = window_mean(previous_start, previous_end);

    if previous == 0.0 {
        return Trend {
            value: 0.0,
            direction: TrendDirection::Neutral,
        };
    }

    let percent = (current - previous) / previous * 100.0;
    let direction = if percent > 0.0 {
        TrendDirection::Up
    } else if percent < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };

    Trend {
        value: round1(percent.abs()),
        direction,
    }
}
