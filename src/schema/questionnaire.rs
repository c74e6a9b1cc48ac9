use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FieldError;

pub const MAX_ANSWER_VALUE: i64 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireAnswer {
    pub question: String,
    /// Likert-style answer, 0..=3
    pub answer: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireResponse {
    pub id: Uuid,
    pub room_code: String,
    pub responses: Vec<QuestionnaireAnswer>,
    pub total_score: Option<u32>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionnaireResponse {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.room_code.trim().is_empty() {
            errors.push(FieldError::new("room_code", "is required"));
        }
        if self.responses.is_empty() {
            errors.push(FieldError::new("responses", "must contain at least one answer"));
        }
        for (i, entry) in self.responses.iter().enumerate() {
            if entry.question.trim().is_empty() {
                errors.push(FieldError::new(
                    "responses",
                    format!("answer {} is missing its question text", i + 1),
                ));
            }
        }
        errors
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAnswer {
    pub question: String,
    pub answer: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewQuestionnaireResponse {
    pub room_code: String,
    pub responses: Vec<NewAnswer>,
    #[serde(default)]
    pub total_score: Option<i64>,
}

/// Range-check raw answers; violations name the offending entry.
pub fn parse_answers(raw: &[NewAnswer]) -> Result<Vec<QuestionnaireAnswer>, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut answers = Vec::with_capacity(raw.len());
    for (i, entry) in raw.iter().enumerate() {
        if !(0..=MAX_ANSWER_VALUE).contains(&entry.answer) {
            errors.push(FieldError::new(
                "responses",
                format!("answer {} must be between 0 and {}", i + 1, MAX_ANSWER_VALUE),
            ));
        } else {
            answers.push(QuestionnaireAnswer {
                question: entry.question.clone(),
                answer: entry.answer as u8,
            });
        }
    }
    if errors.is_empty() {
        Ok(answers)
    } else {
        Err(errors)
    }
}

pub fn parse_total_score(value: i64) -> Result<u32, FieldError> {
    if value >= 0 {
        Ok(value as u32)
    } else {
        Err(FieldError::new("total_score", "cannot be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_outside_range_are_rejected_with_position() {
        let raw = vec![
            NewAnswer { question: "Sleep quality?".to_string(), answer: 2 },
            NewAnswer { question: "Appetite?".to_string(), answer: 7 },
        ];
        let errors = parse_answers(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("answer 2"));
    }

    #[test]
    fn empty_response_list_is_invalid() {
        let response = QuestionnaireResponse {
            id: Uuid::new_v4(),
            room_code: "calm-corner".to_string(),
            responses: vec![],
            total_score: None,
            owner_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(response.validate().iter().any(|e| e.field == "responses"));
    }

    #[test]
    fn negative_score_is_invalid() {
        assert!(parse_total_score(-1).is_err());
        assert_eq!(parse_total_score(12).unwrap(), 12);
    }
}
