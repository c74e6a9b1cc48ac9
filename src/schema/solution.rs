use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SolutionStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A proposed remediation for a reported problem.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub proposed_solution: String,
    pub status: SolutionStatus,
    pub confidence_level: Option<f64>,
    pub estimated_resolution_days: Option<u32>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Solution {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.proposed_solution.trim().is_empty() {
            errors.push(FieldError::new("proposed_solution", "is required"));
        }
        if let Some(confidence) = self.confidence_level {
            if !(0.0..=1.0).contains(&confidence) {
                errors.push(FieldError::new("confidence_level", "must be between 0 and 1"));
            }
        }
        errors
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSolution {
    pub problem_id: Uuid,
    pub proposed_solution: String,
    #[serde(default)]
    pub confidence_level: Option<f64>,
    #[serde(default)]
    pub estimated_resolution_days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolutionPatch {
    pub proposed_solution: Option<String>,
    pub confidence_level: Option<f64>,
    pub estimated_resolution_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolutionStatusChange {
    pub status: String,
}

pub fn parse_status(value: &str) -> Result<SolutionStatus, FieldError> {
    SolutionStatus::parse(value)
        .ok_or_else(|| FieldError::new("status", "must be one of pending, accepted, rejected"))
}

pub fn parse_resolution_days(value: i64) -> Result<u32, FieldError> {
    if value >= 0 {
        Ok(value as u32)
    } else {
        Err(FieldError::new("estimated_resolution_days", "cannot be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution() -> Solution {
        Solution {
            id: Uuid::new_v4(),
            problem_id: Uuid::new_v4(),
            proposed_solution: "Schedule weekly peer-support sessions".to_string(),
            status: SolutionStatus::Pending,
            confidence_level: Some(0.8),
            estimated_resolution_days: Some(14),
            owner_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn valid_solution_passes() {
        assert!(solution().validate().is_empty());
    }

    #[test]
    fn confidence_out_of_unit_interval_is_rejected() {
        let mut s = solution();
        s.confidence_level = Some(1.5);
        assert!(s.validate().iter().any(|e| e.field == "confidence_level"));
    }

    #[test]
    fn negative_estimate_is_rejected() {
        assert!(parse_resolution_days(-3).is_err());
    }
}
