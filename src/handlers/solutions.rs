use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ensure_can_mutate, require_admin, ApiResponse, ApiResult, AuthUser, Paged};
use crate::schema::solution::{
    self, NewSolution, Solution, SolutionPatch, SolutionStatus, SolutionStatusChange,
};
use crate::state::AppState;

use super::{paginate, parse_payload};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub problem_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/solutions
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Paged<Solution>, ApiError> {
    let status = match query.status.as_deref() {
        Some(value) => {
            Some(solution::parse_status(value).map_err(|e| ApiError::validation(vec![e]))?)
        }
        None => None,
    };

    let mut solutions = state
        .solutions
        .find(|s| {
            status.map_or(true, |wanted| s.status == wanted)
                && query.problem_id.map_or(true, |p| s.problem_id == p)
        })
        .await;
    solutions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (page, total) = paginate(solutions, query.page, query.limit);
    Ok(Paged::new(page, total))
}

/// POST /api/solutions
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Solution> {
    let payload: NewSolution = parse_payload(body)?;

    let mut errors = Vec::new();
    let estimated_resolution_days = match payload.estimated_resolution_days {
        None => None,
        Some(value) => match solution::parse_resolution_days(value) {
            Ok(days) => Some(days),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    };

    let now = Utc::now();
    let record = Solution {
        id: Uuid::new_v4(),
        problem_id: payload.problem_id,
        proposed_solution: payload.proposed_solution,
        status: SolutionStatus::Pending,
        confidence_level: payload.confidence_level,
        estimated_resolution_days,
        owner_id: Some(auth.user_id),
        created_at: now,
        updated_at: now,
    };

    errors.extend(record.validate());
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    state.solutions.insert(record.id, record.clone()).await;
    Ok(ApiResponse::created(record).with_message("Solution proposed successfully"))
}

/// GET /api/solutions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Solution> {
    let solution = state.solutions.try_get(id).await?;
    Ok(ApiResponse::success(solution))
}

/// PUT /api/solutions/:id - Owner refines the proposal
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Solution> {
    let patch: SolutionPatch = parse_payload(body)?;

    let stored = state.solutions.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "solution")?;

    let mut errors = Vec::new();
    let mut merged = stored;
    if let Some(proposed_solution) = patch.proposed_solution {
        merged.proposed_solution = proposed_solution;
    }
    if let Some(confidence_level) = patch.confidence_level {
        merged.confidence_level = Some(confidence_level);
    }
    if let Some(value) = patch.estimated_resolution_days {
        match solution::parse_resolution_days(value) {
            Ok(days) => merged.estimated_resolution_days = Some(days),
            Err(e) => errors.push(e),
        }
    }

    errors.extend(merged.validate());
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    merged.updated_at = Utc::now();

    let updated = state.solutions.replace(id, merged).await?;
    Ok(ApiResponse::success(updated))
}

/// PUT /api/solutions/:id/status - Admin verdict on a proposal
pub async fn set_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Solution> {
    require_admin(&auth)?;
    let change: SolutionStatusChange = parse_payload(body)?;
    let status =
        solution::parse_status(&change.status).map_err(|e| ApiError::validation(vec![e]))?;

    let stored = state.solutions.try_get(id).await?;
    let mut merged = stored;
    merged.status = status;
    merged.updated_at = Utc::now();

    let updated = state.solutions.replace(id, merged).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/solutions/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let stored = state.solutions.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "solution")?;

    state.solutions.remove(id).await?;
    Ok(ApiResponse::success(Value::Null).with_message("Solution deleted successfully"))
}
