use axum::{
    extract::{Extension, State},
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

use crate::auth::{self, password, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::schema::user::{
    self, AccountStatus, RegisterUser, Role, User,
};
use crate::state::AppState;

use super::parse_payload;

/// POST /auth/register - Create an account
///
/// Role defaults to student. Registering an admin account requires the
/// configured admin registration secret.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<User> {
    let payload: RegisterUser = parse_payload(body)?;

    let mut errors = Vec::new();

    let role = match payload.role.as_deref() {
        None => Role::Student,
        Some(value) => match user::parse_role(value) {
            Ok(role) => role,
            Err(e) => {
                errors.push(e);
                Role::Student
            }
        },
    };

    if role == Role::Admin {
        let secret = &config::config().security.admin_registration_secret;
        if secret.is_empty() || payload.admin_secret.as_deref() != Some(secret.as_str()) {
            return Err(ApiError::forbidden("Admin registration requires a valid admin secret"));
        }
    }

    let speciality = match payload.speciality.as_deref() {
        None => None,
        Some(value) => match user::parse_speciality(value) {
            Ok(s) => Some(s),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    };

    let level = match payload.level {
        None => None,
        Some(value) => match user::parse_level(value) {
            Ok(l) => Some(l),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    };

    if let Some(e) = user::validate_password(&payload.password) {
        errors.push(e);
    }

    let now = Utc::now();
    let candidate = User {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        // hashed below, once, only after validation passes
        password_hash: String::new(),
        date_of_birth: payload.date_of_birth,
        role,
        speciality,
        level,
        account_status: AccountStatus::default_for(role),
        receive_emails: payload.receive_emails.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    // Skip record-level complaints about fields that already failed to parse,
    // so one bad input does not show up twice in the list
    let failed: HashSet<String> = errors.iter().map(|e| e.field.clone()).collect();
    errors.extend(candidate.validate().into_iter().filter(|e| !failed.contains(&e.field)));

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let mut record = candidate;
    record.password_hash = password::hash(&payload.password)?;

    let email = record.email.clone();
    state
        .users
        .insert_unique(record.id, record.clone(), |other| {
            (other.email == email).then(|| format!("The email {} is already used", email))
        })
        .await?;

    tracing::info!(user = %record.username, role = record.role.as_str(), "account registered");
    Ok(ApiResponse::created(record).with_message("Account registered successfully"))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/// POST /auth/login - Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<LoginResponse> {
    let payload: LoginRequest = parse_payload(body)?;

    // One message for both failure modes; never reveal which part was wrong
    let denied = || ApiError::unauthorized("Incorrect email or password");

    let email = payload.email.clone();
    let user = state.users.find_one(|u| u.email == email).await.ok_or_else(denied)?;

    if !password::verify(&payload.password, &user.password_hash)? {
        return Err(denied());
    }

    let claims = Claims::new(user.id, user.username.clone(), user.role);
    let expires_in = claims.exp - claims.iat;
    let token = auth::issue_token(&claims).map_err(|e| {
        tracing::error!("token issue failed: {}", e);
        ApiError::internal_server_error("Could not issue session token")
    })?;

    tracing::info!(user = %user.username, "login");
    Ok(ApiResponse::success(LoginResponse { token, expires_in, user }))
}

/// GET /api/auth/whoami - Current account, resolved from the bearer token
pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state.users.try_get(auth.user_id).await?;
    Ok(ApiResponse::success(user))
}
