use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use chrono_tz::Tz;
use sqlx::types::Json as Jsonb;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dashboard::dates::{local_day, resolve_tz};
use crate::error::{AppError, AppResult};
use crate::models::entry::{CreateEntryRequest, EntryQuery, PainEntry, UpdateEntryRequest};
use crate::AppState;

/// All of a user's entries, newest first. Callers that need a filtered
/// subset filter in memory so that local-day semantics stay in one place.
pub(crate) async fn fetch_entries(db: &sqlx::PgPool, user_id: Uuid) -> AppResult<Vec<PainEntry>> {
    let entries = sqlx::query_as::<_, PainEntry>(
        "SELECT * FROM pain_entries WHERE user_id = $1 ORDER BY recorded_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(entries)
}

pub(crate) async fn fetch_timezone(db: &sqlx::PgPool, user_id: Uuid) -> AppResult<Tz> {
    let name = sqlx::query_scalar::<_, String>("SELECT timezone FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(resolve_tz(&name))
}

fn broadcast_entry_changed(state: &AppState, user_id: Uuid, entry_id: Uuid) {
    if let Some(tx) = state.ws_tx.as_ref() {
        let msg = serde_json::json!({
            "type": "entry_changed",
            "user_id": user_id,
            "entry_id": entry_id,
        });
        let _ = tx.send(msg.to_string());
    }
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<Json<PainEntry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let recorded_at = body.recorded_at.unwrap_or_else(Utc::now);

    let entry = sqlx::query_as::<_, PainEntry>(
        r#"
        INSERT INTO pain_entries (id, user_id, recorded_at, pain_level, symptoms, quality_of_life, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(recorded_at)
    .bind(body.pain_level)
    .bind(&body.symptoms)
    .bind(body.quality_of_life.map(Jsonb))
    .bind(&body.note)
    .fetch_one(&state.db)
    .await?;

    broadcast_entry_changed(&state, auth_user.id, entry.id);

    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<Vec<PainEntry>>> {
    let tz = fetch_timezone(&state.db, auth_user.id).await?;
    let entries = fetch_entries(&state.db, auth_user.id).await?;

    let filtered: Vec<PainEntry> = entries
        .into_iter()
        .filter(|e| {
            let day = local_day(e.recorded_at, tz);
            if let Some(start) = query.start_date {
                if day < start {
                    return false;
                }
            }
            if let Some(end) = query.end_date {
                if day > end {
                    return false;
                }
            }
            if let Some(symptom) = query.symptom.as_deref() {
                if !e.symptoms.iter().any(|s| s.eq_ignore_ascii_case(symptom)) {
                    return false;
                }
            }
            true
        })
        .collect();

    Ok(Json(filtered))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<PainEntry>> {
    let entry = sqlx::query_as::<_, PainEntry>(
        "SELECT * FROM pain_entries WHERE id = $1 AND user_id = $2",
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Entry not found".into()))?;

    Ok(Json(entry))
}

/// Partial update. `recorded_at` is immutable: the moment an entry
/// describes never changes after creation.
pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateEntryRequest>,
) -> AppResult<Json<PainEntry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let entry = sqlx::query_as::<_, PainEntry>(
        r#"
        UPDATE pain_entries SET
            pain_level = COALESCE($3, pain_level),
            symptoms = COALESCE($4, symptoms),
            quality_of_life = COALESCE($5, quality_of_life),
            note = COALESCE($6, note),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .bind(body.pain_level)
    .bind(&body.symptoms)
    .bind(body.quality_of_life.map(Jsonb))
    .bind(&body.note)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Entry not found".into()))?;

    broadcast_entry_changed(&state, auth_user.id, entry.id);

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    // Idempotent delete — return 200 even if already gone
    let entry = sqlx::query_as::<_, PainEntry>(
        "SELECT * FROM pain_entries WHERE id = $1 AND user_id = $2",
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?;

    if let Some(entry) = entry {
        sqlx::query("DELETE FROM pain_entries WHERE id = $1")
            .bind(entry.id)
            .execute(&state.db)
            .await?;

        broadcast_entry_changed(&state, auth_user.id, entry.id);
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_query_all_fields_optional() {
        let query: EntryQuery = serde_json::from_str("{}").unwrap();
        assert!(query.start_date.is_none());
        assert!(query.end_date.is_none());
        assert!(query.symptom.is_none());
    }

    #[test]
    fn test_create_request_minimal_body() {
        let req: CreateEntryRequest = serde_json::from_str(r#"{"pain_level":5}"#).unwrap();
        assert_eq!(req.pain_level, 5);
        assert!(req.recorded_at.is_none());
        assert!(req.symptoms.is_empty());
        assert!(req.quality_of_life.is_none());
        assert!(req.validate().is_ok());
    }
}
