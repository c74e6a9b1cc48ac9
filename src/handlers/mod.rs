//! Resource controllers, one module per endpoint family.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config;
use crate::error::ApiError;

pub mod associations;
pub mod auth;
pub mod complaints;
pub mod events;
pub mod notifications;
pub mod questionnaires;
pub mod rooms;
pub mod solutions;
pub mod users;

/// Decode a JSON body into a typed payload. Unknown fields and type
/// mismatches come back as a structured 400 instead of a bare rejection.
pub(crate) fn parse_payload<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}

/// 1-based `page` / `limit` pagination over an already-filtered, already-
/// sorted set. When neither parameter is supplied the full set is returned;
/// either one opts into paging with config defaults and caps.
pub(crate) fn paginate<T>(
    items: Vec<T>,
    page: Option<u32>,
    limit: Option<u32>,
) -> (Vec<T>, usize) {
    let total = items.len();
    if page.is_none() && limit.is_none() {
        return (items, total);
    }

    let api = &config::config().api;
    let limit = limit.unwrap_or(api.default_page_size).clamp(1, api.max_page_size) as usize;
    let page = page.unwrap_or(1).max(1) as usize;

    let slice = items.into_iter().skip((page - 1) * limit).take(limit).collect();
    (slice, total)
}
