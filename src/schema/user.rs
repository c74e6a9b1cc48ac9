use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{is_campus_email, is_letters_and_spaces, FieldError};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_ACCOUNT_AGE_YEARS: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Psychiatrist,
    Teacher,
    AssociationMember,
    Admin,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Role::Student),
            "psychiatrist" => Some(Role::Psychiatrist),
            "teacher" => Some(Role::Teacher),
            "association_member" => Some(Role::AssociationMember),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Psychiatrist => "psychiatrist",
            Role::Teacher => "teacher",
            Role::AssociationMember => "association_member",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Speciality {
    A,
    B,
    P,
    Twin,
    Sae,
    Se,
    Bi,
    Ds,
    Iosys,
    Sleam,
    Sim,
    Nids,
    Infini,
}

impl Speciality {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "P" => Some(Self::P),
            "TWIN" => Some(Self::Twin),
            "SAE" => Some(Self::Sae),
            "SE" => Some(Self::Se),
            "BI" => Some(Self::Bi),
            "DS" => Some(Self::Ds),
            "IOSYS" => Some(Self::Iosys),
            "SLEAM" => Some(Self::Sleam),
            "SIM" => Some(Self::Sim),
            "NIDS" => Some(Self::Nids),
            "INFINI" => Some(Self::Infini),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Disabled,
}

impl AccountStatus {
    /// Students start active; staff-like roles are enabled by an admin later.
    pub fn default_for(role: Role) -> Self {
        match role {
            Role::Student | Role::Admin => AccountStatus::Active,
            _ => AccountStatus::Disabled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub speciality: Option<Speciality>,
    pub level: Option<u8>,
    pub account_status: AccountStatus,
    pub receive_emails: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user record is owned by itself.
    pub fn owner_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    /// Validate the whole candidate record. The student-only requirements are
    /// checked against this record's own `role`, so a role change in the same
    /// write is judged consistently with it.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if !is_letters_and_spaces(&self.username) {
            errors.push(FieldError::new("username", "must contain only letters and spaces"));
        }

        if !is_campus_email(&self.email) {
            errors.push(FieldError::new("email", "must be a valid address ending with @esprit.tn"));
        }

        let today = Utc::now().date_naive();
        if self.date_of_birth > today {
            errors.push(FieldError::new("date_of_birth", "cannot be in the future"));
        } else if age_on(self.date_of_birth, today) < MIN_ACCOUNT_AGE_YEARS {
            errors.push(FieldError::new(
                "date_of_birth",
                format!("account holder must be at least {} years old", MIN_ACCOUNT_AGE_YEARS),
            ));
        }

        if self.role == Role::Student {
            if self.speciality.is_none() {
                errors.push(FieldError::new("speciality", "is required for students"));
            }
            match self.level {
                None => errors.push(FieldError::new("level", "is required for students")),
                Some(level) if !(1..=5).contains(&level) => {
                    errors.push(FieldError::new("level", "must be between 1 and 5"));
                }
                Some(_) => {}
            }
        }

        errors
    }
}

fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Registration payload. Enum-ish fields arrive as plain strings/numbers so
/// bad values become field errors instead of body rejections.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub receive_emails: Option<bool>,
    /// Required (and checked against config) only when `role` is `admin`.
    #[serde(default)]
    pub admin_secret: Option<String>,
}

/// Partial update; absent fields keep their stored value. A present
/// `password` is re-hashed; an absent one leaves the stored hash untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub role: Option<String>,
    pub speciality: Option<String>,
    pub level: Option<i64>,
    pub receive_emails: Option<bool>,
    pub account_status: Option<String>,
}

/// Check the pieces of a payload that never reach the stored record as-is.
pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(FieldError::new(
            "password",
            format!("must be at least {} characters long", MIN_PASSWORD_LENGTH),
        ))
    } else {
        None
    }
}

pub fn parse_role(value: &str) -> Result<Role, FieldError> {
    Role::parse(value).ok_or_else(|| {
        FieldError::new(
            "role",
            "must be one of student, psychiatrist, teacher, association_member, admin",
        )
    })
}

pub fn parse_speciality(value: &str) -> Result<Speciality, FieldError> {
    Speciality::parse(value)
        .ok_or_else(|| FieldError::new("speciality", "is not a recognized speciality code"))
}

pub fn parse_account_status(value: &str) -> Result<AccountStatus, FieldError> {
    match value {
        "active" => Ok(AccountStatus::Active),
        "disabled" => Ok(AccountStatus::Disabled),
        _ => Err(FieldError::new("account_status", "must be active or disabled")),
    }
}

pub fn parse_level(value: i64) -> Result<u8, FieldError> {
    if (1..=5).contains(&value) {
        Ok(value as u8)
    } else {
        Err(FieldError::new("level", "must be between 1 and 5"))
    }
}
