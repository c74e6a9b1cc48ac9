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
use crate::schema::room::{NewRoom, Room, RoomPatch};
use crate::state::AppState;

use super::{paginate, parse_payload};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the room code
    pub room_code: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/rooms
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Paged<Room>, ApiError> {
    let needle = query.room_code.as_deref().map(str::to_lowercase);

    let mut rooms = state
        .rooms
        .find(|r| needle.as_deref().map_or(true, |n| r.room_code.to_lowercase().contains(n)))
        .await;
    rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (page, total) = paginate(rooms, query.page, query.limit);
    Ok(Paged::new(page, total))
}

/// POST /api/rooms
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Room> {
    let payload: NewRoom = parse_payload(body)?;

    let now = Utc::now();
    let record = Room {
        id: Uuid::new_v4(),
        room_code: payload.room_code,
        public_keys: payload.public_keys.unwrap_or_default(),
        owner_id: Some(auth.user_id),
        created_at: now,
        updated_at: now,
    };

    let errors = record.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let code = record.room_code.clone();
    state
        .rooms
        .insert_unique(record.id, record.clone(), |other| {
            (other.room_code == code).then(|| format!("Room code {} is already taken", code))
        })
        .await?;

    tracing::info!(room = %record.room_code, "room created");
    Ok(ApiResponse::created(record).with_message("Room created successfully"))
}

/// GET /api/rooms/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Room> {
    let room = state.rooms.try_get(id).await?;
    Ok(ApiResponse::success(room))
}

/// PUT /api/rooms/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Room> {
    let patch: RoomPatch = parse_payload(body)?;

    let stored = state.rooms.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "room")?;

    let mut merged = stored;
    if let Some(room_code) = patch.room_code {
        merged.room_code = room_code;
    }
    if let Some(public_keys) = patch.public_keys {
        merged.public_keys = public_keys;
    }

    let errors = merged.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    merged.updated_at = Utc::now();

    let code = merged.room_code.clone();
    let updated = state
        .rooms
        .replace_unique(id, merged, |other| {
            (other.room_code == code).then(|| format!("Room code {} is already taken", code))
        })
        .await?;

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/rooms/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let stored = state.rooms.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "room")?;

    state.rooms.remove(id).await?;
    tracing::info!(room = %stored.room_code, "room deleted");
    Ok(ApiResponse::success(Value::Null).with_message("Room deleted successfully"))
}
