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
use crate::schema::complaint::{
    self, Complaint, ComplaintPatch, ComplaintStatus, NewComplaint, StatusChange,
};
use crate::state::AppState;
use crate::store::notifications::NotificationKind;

use super::{paginate, parse_payload};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/complaints
///
/// Admins see the whole filterable set (the back-office dashboard); everyone
/// else sees only their own complaints.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Paged<Complaint>, ApiError> {
    let status = match query.status.as_deref() {
        Some(value) => {
            Some(complaint::parse_status(value).map_err(|e| ApiError::validation(vec![e]))?)
        }
        None => None,
    };

    let mut complaints = state
        .complaints
        .find(|c| {
            status.map_or(true, |s| c.status == s)
                && (auth.is_admin() || c.owner_id == Some(auth.user_id))
        })
        .await;
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (page, total) = paginate(complaints, query.page, query.limit);
    Ok(Paged::new(page, total))
}

/// POST /api/complaints
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Complaint> {
    let payload: NewComplaint = parse_payload(body)?;

    let now = Utc::now();
    let record = Complaint {
        id: Uuid::new_v4(),
        subject: payload.subject,
        description: payload.description,
        status: ComplaintStatus::Pending,
        owner_id: Some(auth.user_id),
        created_at: now,
        updated_at: now,
    };

    let errors = record.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    state.complaints.insert(record.id, record.clone()).await;
    Ok(ApiResponse::created(record).with_message("Complaint submitted successfully"))
}

/// GET /api/complaints/:id - Owner or admin only
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Complaint> {
    let stored = state.complaints.try_get(id).await?;
    if !auth.is_admin() && stored.owner_id != Some(auth.user_id) {
        return Err(ApiError::forbidden("You are not allowed to view this complaint"));
    }
    Ok(ApiResponse::success(stored))
}

/// PUT /api/complaints/:id - Owner edits subject/description
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Complaint> {
    let patch: ComplaintPatch = parse_payload(body)?;

    let stored = state.complaints.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "complaint")?;

    let mut merged = stored;
    if let Some(subject) = patch.subject {
        merged.subject = subject;
    }
    if let Some(description) = patch.description {
        merged.description = description;
    }

    let errors = merged.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    merged.updated_at = Utc::now();

    let updated = state.complaints.replace(id, merged).await?;
    Ok(ApiResponse::success(updated).with_message("Complaint updated successfully"))
}

/// PUT /api/complaints/:id/status - Admin-only verdict
///
/// The owner is notified only when the status actually changes.
pub async fn set_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Complaint> {
    require_admin(&auth)?;
    let change: StatusChange = parse_payload(body)?;
    let status =
        complaint::parse_status(&change.status).map_err(|e| ApiError::validation(vec![e]))?;

    let stored = state.complaints.try_get(id).await?;
    let transitioned = stored.status != status;

    let mut merged = stored;
    merged.status = status;
    merged.updated_at = Utc::now();
    let updated = state.complaints.replace(id, merged).await?;

    if transitioned {
        tracing::info!(complaint = %updated.subject, status = updated.status.as_str(), "complaint status changed");
        if let Some(owner_id) = updated.owner_id {
            state
                .notifications
                .append(
                    owner_id,
                    format!(
                        "Your complaint \"{}\" was {}",
                        updated.subject,
                        updated.status.as_str()
                    ),
                    NotificationKind::ComplaintUpdate,
                )
                .await;
        }
    }

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/complaints/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let stored = state.complaints.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "complaint")?;

    state.complaints.remove(id).await?;
    Ok(ApiResponse::success(Value::Null).with_message("Complaint deleted successfully"))
}
