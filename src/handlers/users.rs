use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

use crate::auth::password;
use crate::error::ApiError;
use crate::middleware::{ensure_can_mutate, ApiResponse, ApiResult, AuthUser, Paged};
use crate::schema::user::{self, User, UserPatch};
use crate::state::AppState;

use super::{paginate, parse_payload};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Exact role match, e.g. `role=student`
    pub role: Option<String>,
    /// Case-insensitive substring match on the username
    pub username: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/users - List accounts, filterable and pageable
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Paged<User>, ApiError> {
    let role = match query.role.as_deref() {
        Some(value) => Some(user::parse_role(value).map_err(|e| ApiError::validation(vec![e]))?),
        None => None,
    };
    let needle = query.username.as_deref().map(str::to_lowercase);

    let mut users = state
        .users
        .find(|u| {
            role.map_or(true, |r| u.role == r)
                && needle.as_deref().map_or(true, |n| u.username.to_lowercase().contains(n))
        })
        .await;
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (page, total) = paginate(users, query.page, query.limit);
    Ok(Paged::new(page, total))
}

/// GET /api/users/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<User> {
    let user = state.users.try_get(id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/users/:id - Update an account
///
/// Owner-or-admin. Role and account-status changes are admin-only. The merged
/// record is validated as a whole, so the student-only rules follow whatever
/// role the record ends up with. The password is re-hashed only when the
/// patch carries one.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<User> {
    let patch: UserPatch = parse_payload(body)?;

    let stored = state.users.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id(), "account")?;

    if (patch.role.is_some() || patch.account_status.is_some()) && !auth.is_admin() {
        return Err(ApiError::forbidden("Only an administrator can change roles or account status"));
    }

    let mut errors = Vec::new();
    let mut merged = stored.clone();

    if let Some(username) = patch.username {
        merged.username = username;
    }
    if let Some(email) = patch.email {
        merged.email = email;
    }
    if let Some(date_of_birth) = patch.date_of_birth {
        merged.date_of_birth = date_of_birth;
    }
    if let Some(receive_emails) = patch.receive_emails {
        merged.receive_emails = receive_emails;
    }
    if let Some(value) = patch.role.as_deref() {
        match user::parse_role(value) {
            Ok(role) => merged.role = role,
            Err(e) => errors.push(e),
        }
    }
    if let Some(value) = patch.speciality.as_deref() {
        match user::parse_speciality(value) {
            Ok(s) => merged.speciality = Some(s),
            Err(e) => errors.push(e),
        }
    }
    if let Some(value) = patch.level {
        match user::parse_level(value) {
            Ok(l) => merged.level = Some(l),
            Err(e) => errors.push(e),
        }
    }
    if let Some(value) = patch.account_status.as_deref() {
        match user::parse_account_status(value) {
            Ok(s) => merged.account_status = s,
            Err(e) => errors.push(e),
        }
    }
    if let Some(ref plain) = patch.password {
        if let Some(e) = user::validate_password(plain) {
            errors.push(e);
        }
    }

    let failed: HashSet<String> = errors.iter().map(|e| e.field.clone()).collect();
    errors.extend(merged.validate().into_iter().filter(|e| !failed.contains(&e.field)));
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    // Hash exactly once, and only for writes that change the password
    if let Some(ref plain) = patch.password {
        merged.password_hash = password::hash(plain)?;
    }
    merged.updated_at = Utc::now();

    let email = merged.email.clone();
    let updated = state
        .users
        .replace_unique(id, merged, |other| {
            (other.email == email).then(|| format!("The email {} is already used", email))
        })
        .await?;

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/users/:id - Hard delete an account
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let stored = state.users.try_get(id).await?;
    ensure_can_mutate(&auth, stored.owner_id(), "account")?;

    state.users.remove(id).await?;
    tracing::info!(user = %stored.username, "account deleted");
    Ok(ApiResponse::success(Value::Null).with_message("Account deleted successfully"))
}
