use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Success envelope: `{ data, message? }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: Option<String>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Plain 200 OK with data
    pub fn success(data: T) -> Self {
        Self { data, message: None, status_code: None }
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self { data, message: None, status_code: Some(StatusCode::CREATED) }
    }

    /// Attach a human confirmation message to the envelope
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Failed to serialize response data" })),
                )
                    .into_response();
            }
        };

        let envelope = match self.message {
            Some(message) => json!({ "data": data, "message": message }),
            None => json!({ "data": data }),
        };

        (status, Json(envelope)).into_response()
    }
}

/// Paged list envelope: `{ data, total_count }`. `total_count` is the size of
/// the full filtered set, so callers can compute page counts.
#[derive(Debug, Serialize)]
pub struct Paged<T: Serialize> {
    pub data: Vec<T>,
    pub total_count: usize,
}

impl<T: Serialize> Paged<T> {
    pub fn new(data: Vec<T>, total_count: usize) -> Self {
        Self { data, total_count }
    }
}

impl<T: Serialize> IntoResponse for Paged<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self) {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize paged response: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Failed to serialize response data" })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
