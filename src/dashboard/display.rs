use serde::Serialize;

use super::aggregate::{MetricsSnapshot, RecentEntry, TrendDirection};

/// How a trend should be rendered. Rising pain is the bad outcome, so `Up`
/// maps to `Negative` and `Down` to `Positive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendTone {
    Positive,
    Negative,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub value: String,
    pub direction: TrendDirection,
    pub tone: TrendTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityRow {
    pub label: &'static str,
    pub range: &'static str,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub average: Option<f64>,
    pub count: u32,
}

/// Display-ready dashboard payload. Everything here is a formatted copy of
/// a snapshot field; no metric is computed in this module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub total_entries: usize,
    pub average_pain: String,
    pub overall_average: String,
    pub weekly_average: String,
    pub today_count: usize,
    pub today_summary: String,
    pub trend: TrendView,
    pub recent_activity: Vec<RecentEntry>,
    pub severity: Vec<SeverityRow>,
    pub series: Vec<ChartPoint>,
}

pub fn present(snapshot: &MetricsSnapshot) -> DashboardView {
    DashboardView {
        total_entries: snapshot.total_entries,
        average_pain: format_scale(snapshot.average_pain),
        overall_average: format_scale(snapshot.overall_average),
        weekly_average: format_scale(snapshot.weekly_average),
        today_count: snapshot.today_count,
        today_summary: match snapshot.today_count {
            0 => "No entries yet today".to_string(),
            1 => "1 entry today".to_string(),
            n => format!("{} entries today", n),
        },
        trend: TrendView {
            value: format!("{:.1}%", snapshot.trend.value),
            direction: snapshot.trend.direction,
            tone: match snapshot.trend.direction {
                TrendDirection::Up => TrendTone::Negative,
                TrendDirection::Down => TrendTone::Positive,
                TrendDirection::Neutral => TrendTone::Muted,
            },
        },
        recent_activity: snapshot.recent_activity.clone(),
        severity: vec![
            SeverityRow {
                label: "Mild",
                range: "0-2",
                count: snapshot.severity.mild,
            },
            SeverityRow {
                label: "Moderate",
                range: "3-5",
                count: snapshot.severity.moderate,
            },
            SeverityRow {
                label: "Severe",
                range: "6-8",
                count: snapshot.severity.severe,
            },
            SeverityRow {
                label: "Extreme",
                range: "9-10",
                count: snapshot.severity.extreme,
            },
        ],
        series: snapshot
            .series
            .iter()
            .map(|point| ChartPoint {
                label: point.label.clone(),
                average: point.average.map(|avg| (avg * 10.0).round() / 10.0),
                count: point.count,
            })
            .collect(),
    }
}

fn format_scale(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::aggregate::aggregate;
    use crate::models::entry::PainEntry;
    use chrono::{DateTime, TimeZone, Utc};
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

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fixed_one_decimal_strings() {
        let entries = vec![
            entry(3, now()),
            entry(5, now()),
            entry(8, now()),
        ];
        let view = present(&aggregate(&entries, None, now(), chrono_tz::UTC));
        assert_eq!(view.average_pain, "5.3");
        assert_eq!(view.weekly_average, "5.3");
        assert_eq!(view.overall_average, "5.3");
    }

    #[test]
    fn test_whole_numbers_keep_trailing_decimal() {
        let entries = vec![entry(4, now())];
        let view = present(&aggregate(&entries, None, now(), chrono_tz::UTC));
        assert_eq!(view.average_pain, "4.0");
    }

    #[test]
    fn test_rising_pain_renders_negative_tone() {
        let entries = vec![
            entry(6, now()),
            entry(4, Utc.with_ymd_and_hms(2026, 7, 30, 9, 0, 0).unwrap()),
        ];
        let view = present(&aggregate(&entries, None, now(), chrono_tz::UTC));
        assert_eq!(view.trend.direction, TrendDirection::Up);
        assert_eq!(view.trend.tone, TrendTone::Negative);
        assert_eq!(view.trend.value, "50.0%");
    }

    #[test]
    fn test_falling_pain_renders_positive_tone() {
        let entries = vec![
            entry(2, now()),
            entry(8, Utc.with_ymd_and_hms(2026, 7, 28, 9, 0, 0).unwrap()),
        ];
        let view = present(&aggregate(&entries, None, now(), chrono_tz::UTC));
        assert_eq!(view.trend.tone, TrendTone::Positive);
    }

    #[test]
    fn test_empty_state_today_summary() {
        let view = present(&aggregate(&[], None, now(), chrono_tz::UTC));
        assert_eq!(view.today_summary, "No entries yet today");
        assert_eq!(view.trend.tone, TrendTone::Muted);
    }

    #[test]
    fn test_today_summary_pluralization() {
        let one = present(&aggregate(&[entry(4, now())], None, now(), chrono_tz::UTC));
        assert_eq!(one.today_summary, "1 entry today");

        let two_entries = vec![entry(4, now()), entry(5, now())];
        let two = present(&aggregate(&two_entries, None, now(), chrono_tz::UTC));
        assert_eq!(two.today_summary, "2 entries today");
    }

    #[test]
    fn test_severity_rows_fixed_order_and_ranges() {
        let view = present(&aggregate(&[], None, now(), chrono_tz::UTC));
        let labels: Vec<&str> = view.severity.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Mild", "Moderate", "Severe", "Extreme"]);
        assert_eq!(view.severity[0].range, "0-2");
        assert_eq!(view.severity[3].range, "9-10");
    }

    #[test]
    fn test_chart_gaps_survive_formatting() {
        // A gap must stay None after rounding; a pain-0 day must stay 0.0
        let entries = vec![entry(0, Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap())];
        let view = present(&aggregate(&entries, None, now(), chrono_tz::UTC));
        assert_eq!(view.series[5].average, Some(0.0));
        assert_eq!(view.series[6].average, None);
    }

    #[test]
    fn test_chart_averages_rounded_to_one_decimal() {
        let day = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
        let entries = vec![entry(3, day), entry(5, day), entry(8, day)];
        let view = present(&aggregate(&entries, None, now(), chrono_tz::UTC));
        assert_eq!(view.series[6].average, Some(5.3));
    }
}
