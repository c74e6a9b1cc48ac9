use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::FieldError;

/// An end-to-end encrypted chat room: the server only ever stores room
/// membership and each member's public key.
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: Uuid,
    pub room_code: String,
    /// member id -> public key
    pub public_keys: HashMap<String, String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.room_code.trim().is_empty() {
            errors.push(FieldError::new("room_code", "is required"));
        }
        for (member, key) in &self.public_keys {
            if key.trim().is_empty() {
                errors.push(FieldError::new(
                    "public_keys",
                    format!("public key for member {} cannot be empty", member),
                ));
            }
        }
        errors
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRoom {
    pub room_code: String,
    #[serde(default)]
    pub public_keys: Option<HashMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomPatch {
    pub room_code: Option<String>,
    pub public_keys: Option<HashMap<String, String>>,
}
