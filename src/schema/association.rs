use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_text, is_alphanumeric_and_spaces, is_valid_email, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportType {
    Financial,
    Material,
    Educational,
    Other,
}

impl SupportType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "financial" => Some(Self::Financial),
            "material" => Some(Self::Material),
            "educational" => Some(Self::Educational),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl Default for SupportType {
    fn default() -> Self {
        Self::Other
    }
}

/// An approval-bearing kind: `approved` starts false and is flipped only by
/// an administrator through the approval operation.
#[derive(Debug, Clone, Serialize)]
pub struct Association {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub logo_url: Option<String>,
    pub support_type: SupportType,
    pub approved: bool,
    /// Nullable: legacy records may predate ownership tracking. Ownerless
    /// records are admin-mutable only.
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Association {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check_text(&mut errors, "name", &self.name, 6, 30);
        if !self.name.trim().is_empty() && !is_alphanumeric_and_spaces(&self.name) {
            errors.push(FieldError::new("name", "can only contain letters, numbers, and spaces"));
        }

        check_text(&mut errors, "description", &self.description, 10, 1000);

        if !is_valid_email(&self.contact_email) {
            errors.push(FieldError::new("contact_email", "must be a valid email address"));
        }

        errors
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAssociation {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub support_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub logo_url: Option<String>,
    pub support_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApprovalChange {
    pub approved: bool,
}

pub fn parse_support_type(value: &str) -> Result<SupportType, FieldError> {
    SupportType::parse(value).ok_or_else(|| {
        FieldError::new("support_type", "must be one of financial, material, educational, other")
    })
}
