use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ensure_can_mutate, ApiResponse, ApiResult, AuthUser, Paged};
use crate::schema::questionnaire::{
    self, NewQuestionnaireResponse, QuestionnaireResponse,
};
use crate::state::AppState;

use super::{paginate, parse_payload};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub room_code: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/questionnaires
///
/// Questionnaire answers are sensitive: non-admins only ever see their own
/// submissions.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Paged<QuestionnaireResponse>, ApiError> {
    let mut responses = state
        .questionnaires
        .find(|q| {
            query.room_code.as_deref().map_or(true, |code| q.room_code == code)
                && (auth.is_admin() || q.owner_id == Some(auth.user_id))
        })
        .await;
    responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (page, total) = paginate(responses, query.page, query.limit);
    Ok(Paged::new(page, total))
}

/// POST /api/questionnaires
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<QuestionnaireResponse> {
    let payload: NewQuestionnaireResponse = parse_payload(body)?;

    let mut errors = Vec::new();
    let answers = match questionnaire::parse_answers(&payload.responses) {
        Ok(answers) => answers,
        Err(mut range_errors) => {
            errors.append(&mut range_errors);
            Vec::new()
        }
    };
    let total_score = match payload.total_score {
        None => None,
        Some(value) => match questionnaire::parse_total_score(value) {
            Ok(score) => Some(score),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    };

    let now = Utc::now();
    let record = QuestionnaireResponse {
        id: Uuid::new_v4(),
        room_code: payload.room_code,
        responses: answers,
        total_score,
        owner_id: Some(auth.user_id),
        created_at: now,
        updated_at: now,
    };

    // Range errors above already cover the emptied-out list case
    if errors.is_empty() {
        errors.extend(record.validate());
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    state.questionnaires.insert(record.id, record.clone()).await;
    Ok(ApiResponse::created(record).with_message("Questionnaire submitted successfully"))
}

/// GET /api/questionnaires/:id - Owner or admin only
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<QuestionnaireResponse> {
    let stored = state.questionnaires.try_get(id).await?;
    if !auth.is_admin() && stored.owner_id != Some(auth.user_id) {
        return Err(ApiError::forbidden("You are not allowed to view this questionnaire response"));
    }
    Ok(ApiResponse::success(stored))
}

/// DELETE /api/questionnaires/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let stored = state.questionnaires.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "questionnaire response")?;

    state.questionnaires.remove(id).await?;
    Ok(ApiResponse::success(Value::Null).with_message("Questionnaire response deleted successfully"))
}
