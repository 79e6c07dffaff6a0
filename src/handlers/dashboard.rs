use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::dashboard::dates::local_day;
use crate::dashboard::{aggregate, present, DashboardView};
use crate::error::AppResult;
use crate::handlers::entries::{fetch_entries, fetch_timezone};
use crate::models::entry::PainEntry;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Range filter: "7d", "14d", "30d", "90d". Default: all-time.
    pub range: Option<String>,
    pub symptom: Option<String>,
}

impl DashboardQuery {
    /// Parse range string into a day count; None means all-time.
    pub fn range_days(&self) -> Option<i64> {
        match self.range.as_deref() {
            Some("7d") => Some(7),
            Some("14d") => Some(14),
            Some("30d") => Some(30),
            Some("90d") => Some(90),
            _ => None,
        }
    }
}

/// The only consumer-facing metrics computation in the system: the filter
/// defined by the query params produces the primary collection, while the
/// unfiltered set always serves as the all-time collection.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardView>> {
    let tz = fetch_timezone(&state.db, auth_user.id).await?;
    let entries = fetch_entries(&state.db, auth_user.id).await?;

    let now = Utc::now();
    let today = local_day(now, tz);

    let filtered: Vec<PainEntry> = entries
        .iter()
        .filter(|e| {
            let in_range = query.range_days().map_or(true, |days| {
                let day = local_day(e.recorded_at, tz);
                day >= today - Duration::days(days - 1) && day <= today
            });
            let matches_symptom = query
                .symptom
                .as_deref()
                .map_or(true, |s| e.symptoms.iter().any(|sym| sym.eq_ignore_ascii_case(s)));
            in_range && matches_symptom
        })
        .cloned()
        .collect();

    let snapshot = aggregate(&filtered, Some(&entries), now, tz);

    Ok(Json(present(&snapshot)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_days_known_values() {
        let parse = |s: &str| DashboardQuery {
            range: Some(s.to_string()),
            symptom: None,
        };
        assert_eq!(parse("7d").range_days(), Some(7));
        assert_eq!(parse("14d").range_days(), Some(14));
        assert_eq!(parse("30d").range_days(), Some(30));
        assert_eq!(parse("90d").range_days(), Some(90));
    }

    #[test]
    fn test_range_days_defaults_to_all_time() {
        let none = DashboardQuery {
            range: None,
            symptom: None,
        };
        assert_eq!(none.range_days(), None);

        let unknown = DashboardQuery {
            range: Some("1y".to_string()),
            symptom: None,
        };
        assert_eq!(unknown.range_days(), None);
    }
}
