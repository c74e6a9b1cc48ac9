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
use crate::schema::association::{
    self, ApprovalChange, Association, AssociationPatch, NewAssociation, SupportType,
};
use crate::schema::user::Role;
use crate::state::AppState;
use crate::store::notifications::NotificationKind;

use super::{paginate, parse_payload};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the association name
    pub name: Option<String>,
    /// Exact approval-state match, e.g. `approved=true` for the public site
    pub approved: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/associations
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Paged<Association>, ApiError> {
    let needle = query.name.as_deref().map(str::to_lowercase);

    let mut associations = state
        .associations
        .find(|a| {
            query.approved.map_or(true, |wanted| a.approved == wanted)
                && needle.as_deref().map_or(true, |n| a.name.to_lowercase().contains(n))
        })
        .await;
    associations.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (page, total) = paginate(associations, query.page, query.limit);
    Ok(Paged::new(page, total))
}

/// POST /api/associations
///
/// Only association members (or admins) can create one. New associations
/// start unapproved and stay hidden from the public listing until an admin
/// flips them.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Association> {
    if auth.role != Role::AssociationMember && !auth.is_admin() {
        return Err(ApiError::forbidden("Only association members can add an association"));
    }

    let payload: NewAssociation = parse_payload(body)?;

    let mut errors = Vec::new();
    let support_type = match payload.support_type.as_deref() {
        None => SupportType::default(),
        Some(value) => match association::parse_support_type(value) {
            Ok(s) => s,
            Err(e) => {
                errors.push(e);
                SupportType::default()
            }
        },
    };

    let now = Utc::now();
    let record = Association {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        contact_email: payload.contact_email,
        logo_url: payload.logo_url,
        support_type,
        approved: false,
        owner_id: Some(auth.user_id),
        created_at: now,
        updated_at: now,
    };

    errors.extend(record.validate());
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let email = record.contact_email.clone();
    state
        .associations
        .insert_unique(record.id, record.clone(), |other| {
            (other.contact_email == email).then(|| format!("The email {} is already used", email))
        })
        .await?;

    tracing::info!(association = %record.name, "association created");
    Ok(ApiResponse::created(record).with_message("Association added successfully"))
}

/// GET /api/associations/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Association> {
    let association = state.associations.try_get(id).await?;
    Ok(ApiResponse::success(association))
}

/// PUT /api/associations/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Association> {
    let patch: AssociationPatch = parse_payload(body)?;

    let stored = state.associations.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "association")?;

    let mut errors = Vec::new();
    let mut merged = stored;
    if let Some(name) = patch.name {
        merged.name = name;
    }
    if let Some(description) = patch.description {
        merged.description = description;
    }
    if let Some(contact_email) = patch.contact_email {
        merged.contact_email = contact_email;
    }
    if let Some(logo_url) = patch.logo_url {
        merged.logo_url = Some(logo_url);
    }
    if let Some(value) = patch.support_type.as_deref() {
        match association::parse_support_type(value) {
            Ok(s) => merged.support_type = s,
            Err(e) => errors.push(e),
        }
    }

    errors.extend(merged.validate());
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    merged.updated_at = Utc::now();

    let email = merged.contact_email.clone();
    let updated = state
        .associations
        .replace_unique(id, merged, |other| {
            (other.contact_email == email).then(|| format!("The email {} is already used", email))
        })
        .await?;

    Ok(ApiResponse::success(updated))
}

/// PUT /api/associations/:id/approval - Admin-only approval toggle
///
/// Flips only `approved` (and the update timestamp). Re-asserting the current
/// state is accepted and changes nothing; the owner is notified only on an
/// actual transition.
pub async fn set_approval(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Association> {
    require_admin(&auth)?;
    let change: ApprovalChange = parse_payload(body)?;

    let stored = state.associations.try_get(id).await?;
    let transitioned = stored.approved != change.approved;

    let mut merged = stored;
    merged.approved = change.approved;
    merged.updated_at = Utc::now();
    let updated = state.associations.replace(id, merged).await?;

    if transitioned {
        tracing::info!(association = %updated.name, approved = updated.approved, "approval changed");
        if let Some(owner_id) = updated.owner_id {
            let verdict = if updated.approved { "approved" } else { "unapproved" };
            state
                .notifications
                .append(
                    owner_id,
                    format!("Your association \"{}\" was {}", updated.name, verdict),
                    NotificationKind::AssociationApproval,
                )
                .await;
        }
    }

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/associations/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let stored = state.associations.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id, "association")?;

    state.associations.remove(id).await?;
    tracing::info!(association = %stored.name, "association deleted");
    Ok(ApiResponse::success(Value::Null).with_message("Association deleted successfully"))
}
