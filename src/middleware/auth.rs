use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{decode_token, Claims};
use crate::error::ApiError;
use crate::schema::user::Role;

/// Authenticated caller context extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub, username: claims.username, role: claims.role }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Ownership rule: the owner or an admin may mutate; ownerless records
    /// are admin-only.
    pub fn can_mutate(&self, owner_id: Option<Uuid>) -> bool {
        self.is_admin() || owner_id == Some(self.user_id)
    }
}

/// Bearer authentication middleware. A malformed or tampered token is an
/// invalid session; an authentic token past its expiry is a session-expired
/// condition. Both are 401, but clients surface them differently.
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims = decode_token(&token)?;
    if claims.is_expired() {
        return Err(ApiError::SessionExpired);
    }

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer ...` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err(ApiError::unauthorized("Empty bearer token")),
        None => Err(ApiError::unauthorized("Authorization header must use Bearer token format")),
    }
}

/// Guard for admin-only operations.
pub fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Administrator role required"))
    }
}

/// Guard for owner-or-admin mutation, with a denial that names the resource.
pub fn ensure_can_mutate(
    auth: &AuthUser,
    owner_id: Option<Uuid>,
    what: &str,
) -> Result<(), ApiError> {
    if auth.can_mutate(owner_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("You are not allowed to modify this {}", what)))
    }
}
