use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_text, is_time_hhmm, is_valid_email, FieldError};

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub venue: String,
    /// Wall-clock start, 24-hour `HH:MM`
    pub starts_at_time: String,
    pub contact_email: String,
    pub image_url: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check_text(&mut errors, "title", &self.title, 3, 100);
        check_text(&mut errors, "description", &self.description, 10, 1000);
        check_text(&mut errors, "location", &self.location, 3, 200);
        check_text(&mut errors, "venue", &self.venue, 3, 200);

        if !is_time_hhmm(&self.starts_at_time) {
            errors.push(FieldError::new("starts_at_time", "must be a 24-hour HH:MM time"));
        }

        if !is_valid_email(&self.contact_email) {
            errors.push(FieldError::new("contact_email", "must be a valid email address"));
        } else if self.contact_email.chars().count() > 100 {
            errors.push(FieldError::new("contact_email", "must be at most 100 characters"));
        }

        errors
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub venue: String,
    pub starts_at_time: String,
    pub contact_email: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub starts_at_time: Option<String>,
    pub contact_email: Option<String>,
    pub image_url: Option<String>,
}
