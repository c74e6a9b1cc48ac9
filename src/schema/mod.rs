//! Canonical record shapes and validation for every resource kind.
//!
//! Each kind exposes `validate()` on its full record: all field rules are
//! checked independently and every violation is collected, so callers can
//! report the complete list instead of the first failure. Conditional rules
//! (student speciality/level) are functions of the candidate record alone,
//! never of previously stored state.

use serde::Serialize;

pub mod association;
pub mod complaint;
pub mod event;
pub mod questionnaire;
pub mod room;
pub mod solution;
pub mod user;

/// A single field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Push a length-range violation, if any. Empty strings read as "required".
pub(crate) fn check_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.push(FieldError::new(field, "is required"));
    } else if len < min {
        errors.push(FieldError::new(field, format!("must be at least {} characters", min)));
    } else if len > max {
        errors.push(FieldError::new(field, format!("must be at most {} characters", max)));
    }
}

/// Generally-valid email: one '@', non-empty local part, dotted domain.
pub(crate) fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && value.chars().all(|c| !c.is_whitespace())
        }
        _ => false,
    }
}

/// Email restricted to the campus domain.
pub(crate) fn is_campus_email(value: &str) -> bool {
    match value.strip_suffix("@esprit.tn") {
        Some(local) => {
            !local.is_empty()
                && local
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
        }
        None => false,
    }
}

pub(crate) fn is_letters_and_spaces(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().all(|c| c.is_alphabetic() || c == ' ')
}

pub(crate) fn is_alphanumeric_and_spaces(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ')
}

/// 24-hour wall-clock time, `HH:MM` (leading zero on the hour optional).
pub(crate) fn is_time_hhmm(value: &str) -> bool {
    let Some((h, m)) = value.split_once(':') else {
        return false;
    };
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return false;
    }
    let (Ok(h), Ok(m)) = (h.parse::<u8>(), m.parse::<u8>()) else {
        return false;
    };
    h < 24 && m < 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
        assert!(!is_valid_email("nope"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@@b.co"));
    }

    #[test]
    fn campus_email_requires_the_domain() {
        assert!(is_campus_email("foulen.fouleni@esprit.tn"));
        assert!(!is_campus_email("foulen@gmail.com"));
        assert!(!is_campus_email("@esprit.tn"));
        assert!(!is_campus_email("has space@esprit.tn"));
    }

    #[test]
    fn time_pattern() {
        assert!(is_time_hhmm("09:30"));
        assert!(is_time_hhmm("9:30"));
        assert!(is_time_hhmm("23:59"));
        assert!(!is_time_hhmm("24:00"));
        assert!(!is_time_hhmm("12:60"));
        assert!(!is_time_hhmm("12h30"));
        assert!(!is_time_hhmm("12:5"));
    }

    #[test]
    fn text_bounds_collects_the_right_message() {
        let mut errors = Vec::new();
        check_text(&mut errors, "subject", "hi!", 5, 100);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least 5"));

        errors.clear();
        check_text(&mut errors, "subject", "", 5, 100);
        assert_eq!(errors[0].message, "is required");
    }
}
