use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::store::notifications::Notification;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// GET /api/notifications - The caller's notifications, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Notification>> {
    let notifications = state.notifications.list(auth.user_id, query.unread_only).await;
    Ok(ApiResponse::success(notifications))
}

/// PUT /api/notifications/:id/read - Mark one of the caller's notifications
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    if !state.notifications.mark_read(auth.user_id, id).await {
        return Err(ApiError::not_found("notification not found"));
    }
    Ok(ApiResponse::success(Value::Null).with_message("Notification marked as read"))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Value> {
    let marked = state.notifications.mark_all_read(auth.user_id).await;
    Ok(ApiResponse::success(json!({ "marked": marked })))
}
