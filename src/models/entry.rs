use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Fixed set of life areas a flare-up can affect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SocialImpact {
    Work,
    Family,
    SocialActivities,
    Exercise,
    Hobbies,
    Sleep,
}

/// Optional wellbeing record attached to an entry. Present or absent as a
/// whole; partial records are rejected at intake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct QualityOfLife {
    #[validate(range(min = 0, max = 10, message = "sleep_quality must be 0-10"))]
    pub sleep_quality: i16,

    #[validate(range(min = 0, max = 10, message = "mood_impact must be 0-10"))]
    pub mood_impact: i16,

    #[serde(default)]
    pub social_impact: Vec<SocialImpact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PainEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The moment the entry describes. Set at creation, never mutated.
    pub recorded_at: DateTime<Utc>,
    pub pain_level: i16,
    pub symptoms: Vec<String>,
    pub quality_of_life: Option<Json<QualityOfLife>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    /// Default: now. Immutable after creation.
    pub recorded_at: Option<DateTime<Utc>>,

    #[validate(range(min = 0, max = 10, message = "pain_level must be 0-10"))]
    pub pain_level: i16,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 symptoms per entry"))]
    pub symptoms: Vec<String>,

    #[validate]
    pub quality_of_life: Option<QualityOfLife>,

    #[validate(length(max = 5000, message = "Note must be under 5000 characters"))]
    pub note: Option<String>,
}

/// Partial update — absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEntryRequest {
    #[validate(range(min = 0, max = 10, message = "pain_level must be 0-10"))]
    pub pain_level: Option<i16>,

    #[validate(length(max = 20, message = "At most 20 symptoms per entry"))]
    pub symptoms: Option<Vec<String>>,

    #[validate]
    pub quality_of_life: Option<QualityOfLife>,

    #[validate(length(max = 5000, message = "Note must be under 5000 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub symptom: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_impact_snake_case_wire_format() {
        let json = serde_json::to_value(SocialImpact::SocialActivities).unwrap();
        assert_eq!(json, "social_activities");
    }

    #[test]
    fn test_quality_of_life_social_impact_defaults_empty() {
        let qol: QualityOfLife =
            serde_json::from_str(r#"{"sleep_quality":7,"mood_impact":3}"#).unwrap();
        assert_eq!(qol.sleep_quality, 7);
        assert_eq!(qol.mood_impact, 3);
        assert!(qol.social_impact.is_empty());
    }

    #[test]
    fn test_quality_of_life_unknown_impact_rejected() {
        let result = serde_json::from_str::<QualityOfLife>(
            r#"{"sleep_quality":5,"mood_impact":5,"social_impact":["gardening"]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_pain_level_out_of_range_fails_validation() {
        let req: CreateEntryRequest =
            serde_json::from_str(r#"{"pain_level":11}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_unparseable_timestamp_rejected_at_boundary() {
        let result = serde_json::from_str::<CreateEntryRequest>(
            r#"{"pain_level":4,"recorded_at":"not-a-date"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_nested_quality_of_life_validated() {
        let req: CreateEntryRequest = serde_json::from_str(
            r#"{"pain_level":4,"quality_of_life":{"sleep_quality":12,"mood_impact":3}}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
