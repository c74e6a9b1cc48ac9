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
use crate::schema::event::{Event, EventPatch, NewEvent};
use crate::state::AppState;

use super::{paginate, parse_payload};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the title
    pub title: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/events
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Paged<Event>, ApiError> {
    let needle = query.title.as_deref().map(str::to_lowercase);

    let mut events = state
        .events
        .find(|e| needle.as_deref().map_or(true, |n| e.title.to_lowercase().contains(n)))
        .await;
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (page, total) = paginate(events, query.page, query.limit);
    Ok(Paged::new(page, total))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Event> {
    let payload: NewEvent = parse_payload(body)?;

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        title: payload.title,
        description: payload.description,
        date: payload.date,
        location: payload.location,
        venue: payload.venue,
        starts_at_time: payload.starts_at_time,
        contact_email: payload.contact_email,
        image_url: payload.image_url,
        owner_id: Some(auth.user_id),
        created_at: now,
        updated_at: now,
    };

    let errors = event.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    state.events.insert(event.id, event.clone()).await;
    tracing::info!(event = %event.title, "event created");
    Ok(ApiResponse::created(event).with_message("Event created successfully"))
}

/// GET /api/events/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Event> {
    let event = state.events.try_get(id).await?;
    Ok(ApiResponse::success(event))
}

/// PUT /api/events/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Event> {
    let patch: EventPatch = parse_payload(body)?;

    let stored = state.events.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "event")?;

    let mut merged = stored;
    if let Some(title) = patch.title {
        merged.title = title;
    }
    if let Some(description) = patch.description {
        merged.description = description;
    }
    if let Some(date) = patch.date {
        merged.date = date;
    }
    if let Some(location) = patch.location {
        merged.location = location;
    }
    if let Some(venue) = patch.venue {
        merged.venue = venue;
    }
    if let Some(starts_at_time) = patch.starts_at_time {
        merged.starts_at_time = starts_at_time;
    }
    if let Some(contact_email) = patch.contact_email {
        merged.contact_email = contact_email;
    }
    if let Some(image_url) = patch.image_url {
        merged.image_url = Some(image_url);
    }

    let errors = merged.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    merged.updated_at = Utc::now();

    let updated = state.events.replace(id, merged).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/events/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let stored = state.events.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "event")?;

    state.events.remove(id).await?;
    tracing::info!(event = %stored.title, "event deleted");
    Ok(ApiResponse::success(Value::Null).with_message("Event deleted successfully"))
}
